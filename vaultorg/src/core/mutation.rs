// src/core/mutation.rs
//! Applies planned [`Operation`]s to the filesystem.
//!
//! Operations run strictly in input order. A failing item is recorded in the
//! [`ApplyReport`] and the batch moves on; nothing is rolled back.

use crate::core::extract::frontmatter_tags;
use crate::core::frontmatter::{parse_document, serialize, split};
use crate::core::fs::{FileSystem, LocalFs};
use crate::core::properties::apply_steps;
use crate::error::VaultError;
use crate::models::{
    Action, ApplyReport, Failure, Frontmatter, FrontmatterEdit, FrontmatterStatus, Operation,
    Value,
};
use chrono::Utc;
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Bounded, side-effect free view of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<String>,
    /// Operations not listed in `lines`.
    pub remaining: usize,
    pub total: usize,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        if self.remaining > 0 {
            writeln!(f, "  ... and {} more", self.remaining)?;
        }
        write!(f, "{} operation(s) planned", self.total)
    }
}

#[must_use]
pub fn preview(operations: &[Operation], limit: usize) -> Preview {
    Preview {
        lines: operations.iter().take(limit).map(ToString::to_string).collect(),
        remaining: operations.len().saturating_sub(limit),
        total: operations.len(),
    }
}

/// Applies `edit` to the frontmatter currently on disk.
fn edit_frontmatter(current: &Frontmatter, edit: &FrontmatterEdit) -> Frontmatter {
    match edit {
        FrontmatterEdit::Merge(incoming) => {
            let mut next = current.clone();
            next.merge(incoming);
            next
        }
        FrontmatterEdit::AddTag(tag) => {
            let mut tags = frontmatter_tags(current);
            if tags.iter().any(|existing| existing.eq_ignore_ascii_case(tag)) {
                return current.clone();
            }
            tags.push(tag.clone());
            let mut next = current.clone();
            next.insert("tags", Value::List(tags));
            next
        }
        FrontmatterEdit::Properties {
            steps,
            created,
            modified,
        } => apply_steps(current, *steps, *created, *modified).0,
    }
}

/// Path of a timestamped sibling: `<path>.<kind>.<unix millis>`.
fn sibling_path(path: &Path, kind: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{kind}.{}", Utc::now().timestamp_millis()));
    PathBuf::from(name)
}

#[derive(Debug, Clone)]
pub struct Engine<F: FileSystem = LocalFs> {
    fs: F,
    backup: bool,
}

impl Engine<LocalFs> {
    #[must_use]
    pub const fn local() -> Self {
        Self::new(LocalFs)
    }
}

impl<F: FileSystem> Engine<F> {
    /// Creates an engine with backups enabled.
    #[must_use]
    pub const fn new(fs: F) -> Self {
        Self { fs, backup: true }
    }

    /// With backups disabled, rewrites leave no copy behind and deletes are
    /// permanent.
    #[must_use]
    pub const fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Applies `operations` in order, calling `progress(current, total, label)`
    /// after each one whether it succeeded or not.
    pub fn apply<P>(&self, operations: &[Operation], mut progress: P) -> ApplyReport
    where
        P: FnMut(usize, usize, &str),
    {
        let total = operations.len();
        let mut report = ApplyReport {
            total,
            ..ApplyReport::default()
        };
        if operations.is_empty() {
            return report;
        }

        for (index, operation) in operations.iter().enumerate() {
            match self.apply_one(operation) {
                Ok(backup) => {
                    info!("{operation}");
                    report.success_count = report.success_count.saturating_add(1);
                    report.backups.extend(backup);
                }
                Err(error) => {
                    warn!("{operation} failed: {error}");
                    report.failures.push(Failure {
                        operation: operation.clone(),
                        error,
                    });
                }
            }
            progress(index.saturating_add(1), total, &operation.label());
        }

        report
    }

    fn apply_one(&self, operation: &Operation) -> Result<Option<PathBuf>, VaultError> {
        let source = operation.source.as_path();
        match &operation.action {
            Action::Move { to } | Action::Rename { to } => {
                self.relocate(source, to).map(|()| None)
            }
            Action::UpdateFrontmatter { edit } => self.update_frontmatter(source, edit),
            Action::UpdateContent { content } => self.update_content(source, content),
            Action::Delete => self.delete(source),
        }
    }

    fn relocate(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        if !self.fs.exists(from) {
            return Err(VaultError::SourceMissing(from.to_path_buf()));
        }
        if self.fs.exists(to) {
            return Err(VaultError::DestinationExists(to.to_path_buf()));
        }
        if let Some(parent) = to.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| VaultError::io(parent, e))?;
        }
        self.fs.rename(from, to).map_err(|e| VaultError::io(from, e))
    }

    fn read(&self, path: &Path) -> Result<String, VaultError> {
        self.fs
            .read_to_string(path)
            .map_err(|e| VaultError::io(path, e))
    }

    /// Re-reads the file so a stale scan cannot clobber newer frontmatter.
    fn update_frontmatter(
        &self,
        path: &Path,
        edit: &FrontmatterEdit,
    ) -> Result<Option<PathBuf>, VaultError> {
        let raw = self.read(path)?;
        let document = parse_document(&raw);
        if document.status == FrontmatterStatus::Malformed {
            return Err(VaultError::MalformedFrontmatter(path.to_path_buf()));
        }

        let frontmatter = edit_frontmatter(&document.frontmatter, edit);
        if frontmatter == document.frontmatter {
            debug!("{} already up to date", path.display());
            return Ok(None);
        }
        let updated = serialize(&frontmatter, document.body);
        self.write_with_backup(path, &raw, &updated)
    }

    /// Bodies of files with an unparseable block include that block, so it is
    /// only kept separately when it was understood.
    fn update_content(&self, path: &Path, content: &str) -> Result<Option<PathBuf>, VaultError> {
        let raw = self.read(path)?;
        let prefix = if parse_document(&raw).status == FrontmatterStatus::Malformed {
            ""
        } else {
            split(&raw).prefix
        };
        let updated = format!("{prefix}{content}");
        self.write_with_backup(path, &raw, &updated)
    }

    fn write_with_backup(
        &self,
        path: &Path,
        current: &str,
        updated: &str,
    ) -> Result<Option<PathBuf>, VaultError> {
        if current == updated {
            debug!("{} already up to date", path.display());
            return Ok(None);
        }

        let backup = if self.backup {
            let backup = sibling_path(path, "backup");
            self.fs
                .copy(path, &backup)
                .map_err(|e| VaultError::io(&backup, e))?;
            Some(backup)
        } else {
            None
        };

        self.fs
            .write(path, updated)
            .map_err(|e| VaultError::io(path, e))?;
        Ok(backup)
    }

    fn delete(&self, path: &Path) -> Result<Option<PathBuf>, VaultError> {
        if !self.fs.exists(path) {
            return Err(VaultError::SourceMissing(path.to_path_buf()));
        }
        if self.backup {
            let target = sibling_path(path, "deleted");
            self.fs
                .rename(path, &target)
                .map_err(|e| VaultError::io(path, e))?;
            return Ok(Some(target));
        }
        self.fs
            .remove_file(path)
            .map_err(|e| VaultError::io(path, e))?;
        Ok(None)
    }
}
