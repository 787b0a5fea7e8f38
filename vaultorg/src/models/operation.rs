// src/models/operation.rs
use super::frontmatter::Frontmatter;
use crate::error::VaultError;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the file into another directory.
    Move { to: PathBuf },
    /// Rename the file within its directory.
    Rename { to: PathBuf },
    /// Rewrite the frontmatter block by applying `edit` to the block as it is
    /// on disk when the operation runs.
    UpdateFrontmatter { edit: FrontmatterEdit },
    /// Rewrite the body, keeping the frontmatter block as it is on disk.
    UpdateContent { content: String },
    /// Soft-delete by default (moved to a `.deleted.<millis>` sibling).
    Delete,
}

/// Which property strategies run over a frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertySteps {
    pub standardize: bool,
    pub clean: bool,
    pub add_missing: bool,
    pub sort: bool,
}

impl PropertySteps {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            standardize: true,
            clean: true,
            add_missing: true,
            sort: true,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.standardize || self.clean || self.add_missing || self.sort)
    }
}

/// A change to a frontmatter block, described independently of the block it
/// was planned against.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterEdit {
    /// Incoming keys overwrite existing ones in place; new keys are appended.
    Merge(Frontmatter),
    /// Appends a tag to `tags` unless it is already there, ignoring case.
    AddTag(String),
    /// Runs the property strategies. The dates fill in missing
    /// `created`/`modified` values.
    Properties {
        steps: PropertySteps,
        created: Option<NaiveDate>,
        modified: Option<NaiveDate>,
    },
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Rename { .. } => "rename",
            Self::UpdateFrontmatter { .. } => "frontmatter-update",
            Self::UpdateContent { .. } => "content-update",
            Self::Delete => "delete",
        }
    }
}

/// One planned filesystem change.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub source: PathBuf,
    pub action: Action,
    /// Short human description shown in previews, e.g. `3 properties renamed`.
    pub summary: Option<String>,
}

impl Operation {
    #[must_use]
    pub const fn new(source: PathBuf, action: Action) -> Self {
        Self {
            source,
            action,
            summary: None,
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Destination path for moves and renames.
    #[must_use]
    pub fn target(&self) -> Option<&Path> {
        match &self.action {
            Action::Move { to } | Action::Rename { to } => Some(to),
            _ => None,
        }
    }

    /// File name used as the progress label.
    #[must_use]
    pub fn label(&self) -> String {
        self.source
            .file_name()
            .map_or_else(
                || self.source.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.action.kind(), self.source.display())?;
        if let Some(target) = self.target() {
            write!(f, " -> {}", target.display())?;
        }
        if let Some(summary) = &self.summary {
            write!(f, " ({summary})")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Failure {
    pub operation: Operation,
    pub error: VaultError,
}

/// Outcome of applying a batch of operations.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub total: usize,
    pub success_count: usize,
    pub failures: Vec<Failure>,
    /// Backup copies written before mutating files.
    pub backups: Vec<PathBuf>,
}

impl ApplyReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
