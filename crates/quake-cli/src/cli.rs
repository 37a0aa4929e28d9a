use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quake", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a forecasting dataset from a preset
    Featurize {
        /// Preset file (YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        presets: PathBuf,
        /// Name of the preset to build
        #[arg(long)]
        preset: String,
        /// Output file (.csv or .parquet); defaults to the preset's output_dir
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Override the split mode (train or test)
        #[arg(long)]
        mode: Option<String>,
        /// Override the start of the date range (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Override the end of the date range (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Threads to use for aggregation ("auto" or a number)
        #[arg(long, default_value = "auto")]
        threads: String,
        /// Plan the sample grid without aggregating or writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect preset files
    Presets {
        #[command(subcommand)]
        command: PresetCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// List the presets of a file
    List {
        /// Preset file (YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        presets: PathBuf,
    },
    /// Print a resolved preset as JSON
    Show {
        /// Preset file (YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        presets: PathBuf,
        /// Name of the preset
        #[arg(long)]
        preset: String,
    },
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_featurize_overrides() {
        let cli = Cli::try_parse_from([
            "quake",
            "featurize",
            "--presets",
            "presets.yaml",
            "--preset",
            "magn_6",
            "--mode",
            "test",
            "--threads",
            "2",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Featurize {
                preset,
                mode,
                threads,
                dry_run,
                out,
                ..
            }) => {
                assert_eq!(preset, "magn_6");
                assert_eq!(mode.as_deref(), Some("test"));
                assert_eq!(threads, "2");
                assert!(dry_run);
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
