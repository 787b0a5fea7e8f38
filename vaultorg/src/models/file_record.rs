// src/models/file_record.rs
use super::frontmatter::Frontmatter;
use chrono::{DateTime, Local};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// `[text](url)`
    Markdown { text: String, url: String },
    /// `[[page]]` or `[[page|text]]`
    Wiki { page: String, text: String },
}

/// How the frontmatter block of a file was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontmatterStatus {
    /// No `---` delimited block at the top of the file.
    #[default]
    Absent,
    /// Parsed as YAML.
    Parsed,
    /// YAML parsing failed; recovered with line-based `key: value` parsing.
    Recovered,
    /// A block was present but nothing could be recovered from it.
    Malformed,
}

/// In-memory snapshot of one markdown note taken at scan time.
///
/// Records are never mutated after a scan. Once a mutation has been applied
/// to the underlying file the record is stale and the vault must be rescanned.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// File name without extension.
    pub name: String,
    pub size: u64,
    pub created: Option<DateTime<Local>>,
    pub modified: Option<DateTime<Local>>,
    /// Body text with the frontmatter block removed.
    pub content: String,
    pub frontmatter: Frontmatter,
    pub frontmatter_status: FrontmatterStatus,
    pub tags: Vec<String>,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub word_count: usize,
}

impl FileRecord {
    /// The file extension including the leading dot, or an empty string.
    #[must_use]
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn first_heading(&self) -> Option<&Heading> {
        self.headings.first()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .get("title")
            .and_then(super::frontmatter::Value::as_str)
            .filter(|title| !title.trim().is_empty())
    }
}
