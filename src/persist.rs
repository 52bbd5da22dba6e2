use std::{fs, path::Path};

use anyhow::{Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::state::{EditorConfig, EditorState};

/// Writes `data` (the editor config) as compact pretty JSON, creating parent directories.
fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

/// Reads a JSON file such as `config.json` into `T`.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn load_config(path: &Path) -> Result<EditorConfig> {
    if !path.exists() {
        info!("No config at {}, using defaults.", path.display());
        return Ok(EditorConfig::default());
    }
    load_json(path).with_context(|| format!("Unable to load config {}", path.display()))
}

pub fn save_config(state: &mut EditorState) -> Result<()> {
    if state.config.modified {
        save_json(&state.config_path, &state.config)?;
        state.config.modified = false;
    }
    Ok(())
}
