// src/core/organize.rs
//! Destination and file-name strategies.
//!
//! Every function here is pure: it maps a [`FileRecord`] to where the file
//! should live or what it should be called. Turning that into filesystem
//! changes is left to the mutation engine.

use crate::error::VaultError;
use crate::models::{Action, DateField, FileRecord, Operation};
use chrono::{Datelike as _, NaiveDate};
use clap::ValueEnum;
use log::debug;
use std::path::{Path, PathBuf};

/// Directory under the vault root that receives organized files.
pub const ORGANIZED_DIR: &str = "organized";

const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const PLACEHOLDERS: [&str; 5] = ["type", "year", "month", "day", "tags"];
const UNTAGGED: &str = "untagged";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    ByDate(DateField),
    ByTag,
    ByType,
    BySize,
    /// Path template using `{type}`, `{year}`, `{month}`, `{day}`, `{tags}`.
    Custom(String),
}

impl Strategy {
    #[must_use]
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::ByDate(_) => "by-date",
            Self::ByTag => "by-tags",
            Self::ByType => "by-type",
            Self::BySize => "by-size",
            Self::Custom(_) => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenamePattern {
    /// Use the `title` frontmatter property.
    Title,
    /// Use the first heading.
    Heading,
    /// Prefix the name with the creation date.
    DatePrefix,
    /// Strip characters that are unsafe in file names.
    Sanitize,
}

/// Makes a string safe to use as a single path segment.
///
/// Runs of whitespace, hyphens and `< > : " / \ | ? *` become one hyphen;
/// leading and trailing hyphens are dropped.
#[must_use]
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c == '-' || c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(&c) {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen && !out.is_empty() {
            out.push('-');
        }
        pending_hyphen = false;
        out.push(c);
    }
    out
}

/// Note type: the `type` property if set, otherwise a content heuristic.
/// Heuristics are checked in order and the first match wins.
#[must_use]
pub fn classify(record: &FileRecord) -> String {
    if let Some(declared) = record.frontmatter.get("type") {
        let declared = sanitize(&declared.to_string());
        if !declared.is_empty() && declared != "null" {
            return declared;
        }
    }

    let body = record.content.to_lowercase();
    if body.contains("todo") || body.contains("task") || body.contains("- [ ]") {
        return "tasks".to_owned();
    }
    if body.contains("daily note") || body.contains("journal") {
        return "journal".to_owned();
    }
    if record
        .first_heading()
        .is_some_and(|h| h.text.to_lowercase().contains("meeting"))
    {
        return "meetings".to_owned();
    }
    if record
        .tags
        .iter()
        .any(|t| t.eq_ignore_ascii_case("project") || t.eq_ignore_ascii_case("work"))
    {
        return "projects".to_owned();
    }
    "notes".to_owned()
}

/// Size bucket over half-open byte ranges.
#[must_use]
pub const fn size_bucket(size: u64) -> &'static str {
    match size {
        0..1_024 => "tiny",
        1_024..10_240 => "small",
        10_240..102_400 => "medium",
        _ => "large",
    }
}

fn first_tag(record: &FileRecord) -> String {
    record
        .tags
        .first()
        .map(|tag| sanitize(tag))
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| UNTAGGED.to_owned())
}

fn creation_date(record: &FileRecord, today: NaiveDate) -> NaiveDate {
    record.created.map_or(today, |created| created.date_naive())
}

/// Destination directory relative to `<vault>/organized`, or `None` when the
/// record lacks what the strategy needs.
#[must_use]
pub fn destination(record: &FileRecord, strategy: &Strategy, today: NaiveDate) -> Option<PathBuf> {
    let base = PathBuf::from(strategy.dir_name());
    match strategy {
        Strategy::ByDate(field) => {
            let date = match field {
                DateField::Created => record.created,
                DateField::Modified => record.modified,
            }?;
            let year = date.year();
            Some(
                base.join(year.to_string())
                    .join(format!("{year}-{:02}", date.month())),
            )
        }
        Strategy::ByTag => Some(base.join(first_tag(record))),
        Strategy::ByType => Some(base.join(classify(record))),
        Strategy::BySize => Some(base.join(size_bucket(record.size))),
        Strategy::Custom(pattern) => {
            let expanded = expand_pattern(pattern, record, today);
            (expanded.components().next().is_some()).then(|| base.join(expanded))
        }
    }
}

fn expand_pattern(pattern: &str, record: &FileRecord, today: NaiveDate) -> PathBuf {
    let date = creation_date(record, today);
    let kind = classify(record);
    let tag = first_tag(record);

    pattern
        .split(['/', '\\'])
        .map(|segment| {
            sanitize(
                &segment
                    .replace("{type}", &kind)
                    .replace("{year}", &date.year().to_string())
                    .replace("{month}", &format!("{:02}", date.month()))
                    .replace("{day}", &format!("{:02}", date.day()))
                    .replace("{tags}", &tag),
            )
        })
        .filter(|segment| !segment.is_empty() && segment != "." && segment != "..")
        .collect()
}

/// Rejects empty templates and unknown `{placeholders}`.
///
/// # Errors
///
/// Returns [`VaultError::InvalidPattern`] describing the problem.
pub fn validate_pattern(pattern: &str) -> Result<(), VaultError> {
    let has_segment = pattern
        .split(['/', '\\'])
        .any(|segment| !sanitize(segment).is_empty() && !matches!(segment, "." | ".."));
    if !has_segment {
        return Err(VaultError::InvalidPattern(format!(
            "'{pattern}' has no usable path segment"
        )));
    }

    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let after = rest.get(open.saturating_add(1)..).unwrap_or_default();
        let Some(close) = after.find('}') else {
            return Err(VaultError::InvalidPattern(format!(
                "unclosed placeholder in '{pattern}'"
            )));
        };
        let name = after.get(..close).unwrap_or_default();
        if !PLACEHOLDERS.contains(&name) {
            return Err(VaultError::InvalidPattern(format!(
                "unknown placeholder {{{name}}}; expected one of {}",
                PLACEHOLDERS.join(", ")
            )));
        }
        rest = after.get(close.saturating_add(1)..).unwrap_or_default();
    }
    Ok(())
}

/// Plans one move per record into `<vault_root>/organized/...`.
///
/// Records the strategy cannot place, or that are already in place, produce
/// no operation.
///
/// # Errors
///
/// Returns [`VaultError::InvalidPattern`] for an unusable custom template.
pub fn plan_organize(
    records: &[FileRecord],
    vault_root: &Path,
    strategy: &Strategy,
    today: NaiveDate,
) -> Result<Vec<Operation>, VaultError> {
    if let Strategy::Custom(pattern) = strategy {
        validate_pattern(pattern)?;
    }

    let base = vault_root.join(ORGANIZED_DIR);
    let mut operations = Vec::new();
    for record in records {
        let Some(relative) = destination(record, strategy, today) else {
            debug!(
                "skipping {}: no destination for {}",
                record.path.display(),
                strategy.dir_name()
            );
            continue;
        };
        let Some(file_name) = record.path.file_name() else {
            continue;
        };
        let target = base.join(&relative).join(file_name);
        if target == record.path {
            continue;
        }
        operations.push(
            Operation::new(record.path.clone(), Action::Move { to: target })
                .with_summary(relative.display().to_string()),
        );
    }
    Ok(operations)
}

fn has_date_prefix(name: &str) -> bool {
    name.get(..11).is_some_and(|prefix| {
        prefix.ends_with('-')
            && NaiveDate::parse_from_str(prefix.trim_end_matches('-'), "%Y-%m-%d").is_ok()
    })
}

/// New base name (without extension) for a record, or `None` to leave it.
#[must_use]
pub fn rename_target(record: &FileRecord, pattern: RenamePattern, today: NaiveDate) -> Option<String> {
    let candidate = match pattern {
        RenamePattern::Title => record.title().map(sanitize),
        RenamePattern::Heading => record.first_heading().map(|h| sanitize(&h.text)),
        RenamePattern::DatePrefix => (!has_date_prefix(&record.name)).then(|| {
            format!(
                "{}-{}",
                creation_date(record, today).format("%Y-%m-%d"),
                record.name
            )
        }),
        RenamePattern::Sanitize => Some(sanitize(&record.name)),
    }?;
    (!candidate.is_empty() && candidate != record.name).then_some(candidate)
}

/// Plans a rename in place for every record whose name would change.
#[must_use]
pub fn plan_rename(records: &[FileRecord], pattern: RenamePattern, today: NaiveDate) -> Vec<Operation> {
    records
        .iter()
        .filter_map(|record| {
            let name = rename_target(record, pattern, today)?;
            let to = record
                .path
                .with_file_name(format!("{name}{}", record.extension()));
            Some(Operation::new(record.path.clone(), Action::Rename { to }).with_summary(name))
        })
        .collect()
}
