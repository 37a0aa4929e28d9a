use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap_complete::{generate, Shell};

use quake_cli::cli::build_cli_command;

const BIN_NAME: &str = "quake";

/// Print the completion script for `shell`, or write it to `out`.
pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut sink: Box<dyn Write> = match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?)
        }
        None => Box::new(io::stdout()),
    };
    generate(shell, &mut build_cli_command(), BIN_NAME, &mut sink);
    sink.flush().context("flushing completion script")?;
    if let Some(path) = out {
        println!("Wrote {shell} completions for {BIN_NAME} to {}", path.display());
    }
    Ok(())
}
