use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quake_core::{resolve_preset, DatasetConfig, PresetFile};

/// Read a preset file; `.yaml`/`.yml` and `.json` by extension, otherwise YAML then JSON.
pub fn load_presets_from_path(path: &Path) -> Result<PresetFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading preset file '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing preset file yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing preset file json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing preset file"),
    }
}

/// Load `path` and resolve the preset called `name`.
pub fn load_dataset_config(path: &Path, name: &str) -> Result<DatasetConfig> {
    let file = load_presets_from_path(path)?;
    let config = resolve_preset(&file, name)
        .with_context(|| format!("resolving preset '{}' from '{}'", name, path.display()))?;
    Ok(config)
}
