use std::path::Path;

use anyhow::Result;
use quake_cli::cli::PresetCommands;
use quake_core::resolve_preset;
use quake_io::load_presets_from_path;

pub fn handle(command: &PresetCommands) -> Result<()> {
    match command {
        PresetCommands::List { presets } => list(presets),
        PresetCommands::Show { presets, preset } => show(presets, preset),
    }
}

fn list(path: &Path) -> Result<()> {
    let file = load_presets_from_path(path)?;
    println!(
        "{:<32} {:<6} {:>8} {:>8} {:>6}  source",
        "preset", "mode", "min_mag", "class>", "step"
    );
    for name in file.names() {
        // resolve so the listed mode and defaults match what featurize would use
        match resolve_preset(&file, name) {
            Ok(config) => println!(
                "{:<32} {:<6} {:>8} {:>8} {:>6}  {}",
                name,
                config.mode.as_str(),
                config.min_magnitude,
                config.class_threshold,
                config.window_days_step,
                config.source.display()
            ),
            Err(err) => println!("{name:<32} invalid: {err}"),
        }
    }
    Ok(())
}

fn show(path: &Path, name: &str) -> Result<()> {
    let config = quake_io::load_dataset_config(path, name)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
