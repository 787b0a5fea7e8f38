// src/core/ignore/loader.rs
use crate::core::ignore::Patterns;
use anyhow::{Context as _, Result};
use log::debug;
use std::fs;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".vaultignore";

/// Loads the `.vaultignore` file at the vault root, if there is one.
///
/// # Errors
///
/// This function may return an error if:
/// * The ignore file exists but cannot be read
/// * The file contains invalid pattern syntax
#[inline]
pub fn load_ignore_patterns(root: &Path) -> Result<Patterns> {
    let mut patterns = Patterns::new();
    let ignore_file = root.join(IGNORE_FILE_NAME);
    if !ignore_file.is_file() {
        return Ok(patterns);
    }

    let content = fs::read_to_string(&ignore_file)
        .with_context(|| format!("Failed to read {}", ignore_file.display()))?;
    for line in content.lines() {
        patterns.add_pattern(line)?;
    }
    debug!("loaded ignore rules from {}", ignore_file.display());

    Ok(patterns)
}
