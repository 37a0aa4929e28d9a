use std::path::Path;
use std::time::Instant;

use quake_cli::manifest::{record_manifest, RunStatus};

/// Record the manifest of a finished `featurize` run next to its output.
///
/// A manifest that can't be written is reported on stderr; the run's own result
/// is what the command returns.
pub fn record_run_timed(
    out: &Path,
    command: &str,
    params: &[(&str, &str)],
    start: Instant,
    result: &anyhow::Result<()>,
) {
    let status = RunStatus {
        success: result.is_ok(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        error: result.as_ref().err().map(|err| format!("{err:#}")),
    };
    if let Err(err) = record_manifest(out, command, params, status) {
        eprintln!("Failed to record run manifest: {err}");
    }
}
