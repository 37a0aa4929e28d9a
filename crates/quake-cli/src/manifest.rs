use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub outputs: Vec<String>,
    pub params: Vec<Param>,
    pub status: String,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Outcome of the run a manifest describes.
#[derive(Debug, Clone)]
pub struct RunStatus {
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Write `run-<uuid>.json` next to `output` and return its path.
pub fn record_manifest(
    output: &Path,
    command: &str,
    params: &[(&str, &str)],
    status: RunStatus,
) -> Result<PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let manifest = ManifestEntry {
        run_id: run_id.clone(),
        command: command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        outputs: vec![output.display().to_string()],
        params: params
            .iter()
            .map(|(k, v)| Param {
                name: k.to_string(),
                value: v.to_string(),
            })
            .collect(),
        status: if status.success { "success" } else { "failure" }.to_string(),
        duration_ms: status.duration_ms,
        error: status.error,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(format!("run-{}.json", run_id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Recorded run manifest {}", path.display());
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<ManifestEntry> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let manifest = serde_json::from_str(&json)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_lands_next_to_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("features").join("magn_6.csv");
        let path = record_manifest(
            &out,
            "featurize",
            &[("preset", "magn_6"), ("threads", "auto")],
            RunStatus {
                success: true,
                duration_ms: 12,
                error: None,
            },
        )
        .unwrap();
        assert_eq!(path.parent(), out.parent());
        let manifest = read_manifest(&path).unwrap();
        assert_eq!(manifest.command, "featurize");
        assert_eq!(manifest.status, "success");
        assert_eq!(manifest.duration_ms, 12);
        assert!(manifest.error.is_none());
        assert_eq!(manifest.params.len(), 2);
        assert_eq!(manifest.outputs, vec![out.display().to_string()]);
    }

    #[test]
    fn failed_run_keeps_its_error() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("magn_6.csv");
        let path = record_manifest(
            &out,
            "featurize",
            &[],
            RunStatus {
                success: false,
                duration_ms: 3,
                error: Some("empty date range".into()),
            },
        )
        .unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"status\": \"failure\""));
        assert_eq!(read_manifest(&path).unwrap().error.as_deref(), Some("empty date range"));
    }
}
