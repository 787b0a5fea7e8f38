// src/core/scanner.rs
pub mod record;
#[cfg(test)]
pub mod test_utils;
pub mod utils;

pub use record::{build_record, build_record_with};

use crate::config::Config;
use crate::core::ignore::{Patterns, load_ignore_patterns};
use crate::core::scanner::utils::{absolute_path, should_exclude};
use crate::error::VaultError;
use crate::models::{FileRecord, VaultDescriptor};
use anyhow::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions treated as markdown, compared case-insensitively.
pub const MARKDOWN_EXTENSIONS: [&str; 4] = ["md", "markdown", "mdown", "mkd"];

/// Directory names that are never walked.
pub const EXCLUDED_DIRS: [&str; 3] = ["node_modules", ".git", ".obsidian"];

/// Top-level directories with this prefix hold output of earlier organize runs.
pub const ORGANIZED_DIR_PREFIX: &str = "organized";

#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|md| md.eq_ignore_ascii_case(ext))
        })
}

/// Records built from a scan plus the files that could not be read.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    pub errors: Vec<(PathBuf, VaultError)>,
}

impl ScanOutcome {
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len().saturating_add(self.errors.len())
    }
}

/// Walks one vault with the built-in exclusions plus any configured ones.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    exclude_dirs: Vec<String>,
    ignore: Patterns,
}

impl Scanner {
    /// Creates a scanner rooted at `root` with only the built-in exclusions.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is relative and the current directory
    /// cannot be determined.
    pub fn new(root: &Path) -> Result<Self> {
        Ok(Self {
            root: absolute_path(root)?,
            exclude_dirs: Vec::new(),
            ignore: Patterns::new(),
        })
    }

    /// Creates a scanner honouring the vault's config and `.vaultignore`.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The current directory cannot be determined
    /// * The ignore file cannot be read or contains invalid patterns
    pub fn for_vault(root: &Path, config: &Config) -> Result<Self> {
        let scanner = Self::new(root)?;
        let ignore = load_ignore_patterns(&scanner.root)?;
        Ok(scanner
            .with_exclude_dirs(config.exclude.clone())
            .with_ignore(ignore))
    }

    #[must_use]
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    #[must_use]
    pub fn with_ignore(mut self, ignore: Patterns) -> Self {
        self.ignore = ignore;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self) -> impl Iterator<Item = DirEntry> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !should_exclude(e, &self.root, &self.exclude_dirs, &self.ignore))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("skipping unreadable entry: {err}");
                    None
                }
            })
    }

    /// Absolute paths of all markdown files, sorted.
    #[must_use]
    pub fn markdown_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .walk()
            .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
            .map(DirEntry::into_path)
            .collect();
        files.sort();
        files
    }

    /// Absolute paths of all directories below the root, sorted.
    #[must_use]
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .walk()
            .filter(|e| e.depth() > 0 && e.file_type().is_dir())
            .map(DirEntry::into_path)
            .collect();
        dirs.sort();
        dirs
    }

    /// Builds a record for every markdown file. Unreadable files are
    /// collected as errors and do not stop the scan.
    #[must_use]
    pub fn scan(&self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        for path in self.markdown_files() {
            match build_record(&path) {
                Ok(record) => outcome.records.push(record),
                Err(err) => {
                    warn!("failed to read {}: {err}", path.display());
                    outcome.errors.push((path, err));
                }
            }
        }
        debug!(
            "scanned {} files under {} ({} errors)",
            outcome.total(),
            self.root.display(),
            outcome.errors.len()
        );
        outcome
    }
}

/// Inspects a directory and decides whether it looks like a vault.
///
/// Never fails: missing, unreadable or non-directory paths produce a
/// descriptor with `is_vault == false`.
#[must_use]
pub fn analyze(dir: &Path) -> VaultDescriptor {
    let path = absolute_path(dir).unwrap_or_else(|_| dir.to_path_buf());

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            debug!("{} is not a directory", path.display());
            return VaultDescriptor::not_a_vault(path);
        }
        Err(err) => {
            debug!("cannot inspect {}: {err}", path.display());
            return VaultDescriptor::not_a_vault(path);
        }
    }

    let has_obsidian_folder = path.join(".obsidian").is_dir();
    let markdown_file_count = Scanner::new(&path)
        .map(|scanner| scanner.markdown_files().len())
        .unwrap_or(0);

    VaultDescriptor::new(path, has_obsidian_folder, markdown_file_count)
}

/// Lists markdown files below `dir` with the built-in exclusions.
///
/// # Errors
///
/// Returns an error if `dir` is relative and the current directory cannot be
/// determined.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(Scanner::new(dir)?.markdown_files())
}

/// Lists directories below `dir` with the built-in exclusions.
///
/// # Errors
///
/// Returns an error if `dir` is relative and the current directory cannot be
/// determined.
pub fn list_directories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(Scanner::new(dir)?.directories())
}
