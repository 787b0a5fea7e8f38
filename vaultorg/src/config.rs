// src/config.rs
use crate::models::DateField;
use anyhow::{Context as _, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".vaultorg.toml";

/// Settings read from `.vaultorg.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Keep a `.backup.` copy before rewriting and soft-delete instead of
    /// removing.
    pub backup: bool,
    /// Operations listed before the `... and N more` line.
    pub preview_limit: usize,
    /// Extra directory names the scanner skips.
    pub exclude: Vec<String>,
    /// Timestamp `organize date` groups by.
    pub date_field: DateField,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup: true,
            preview_limit: 10,
            exclude: Vec::new(),
            date_field: DateField::Created,
        }
    }
}

/// Finds the nearest config file, starting at `dir` and walking up through
/// its parents.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut visited = HashSet::new();
    let mut current = Some(dir);
    while let Some(candidate) = current {
        if !visited.insert(candidate.to_path_buf()) {
            break;
        }
        let file = candidate.join(CONFIG_FILE_NAME);
        if file.is_file() {
            return Some(file);
        }
        current = candidate.parent();
    }
    None
}

/// Loads the nearest `.vaultorg.toml`, or the defaults when there is none.
///
/// # Errors
///
/// This function may return an error if:
/// * The config file exists but cannot be read
/// * The file is not valid TOML or has unknown keys
pub fn load_config(dir: &Path) -> Result<Config> {
    let Some(file) = find_config_file(dir) else {
        return Ok(Config::default());
    };
    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read config file: {}", file.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", file.display()))?;
    debug!("loaded config from {}", file.display());
    Ok(config)
}
