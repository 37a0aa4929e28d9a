use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

use quake_cli::cli::{Cli, Commands};

mod commands;

use commands::featurize::FeaturizeArgs;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Some(Commands::Featurize {
            presets,
            preset,
            out,
            mode,
            start,
            end,
            threads,
            dry_run,
        }) => commands::featurize::handle(&FeaturizeArgs {
            presets,
            preset,
            out: out.as_deref(),
            mode: mode.as_deref(),
            start: start.as_deref(),
            end: end.as_deref(),
            threads,
            dry_run: *dry_run,
        }),
        Some(Commands::Presets { command }) => commands::presets::handle(command),
        Some(Commands::Completions { shell, out }) => {
            commands::completions::handle(*shell, out.as_deref())
        }
        None => {
            println!("No command provided. Use --help for usage.");
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
