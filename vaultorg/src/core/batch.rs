// src/core/batch.rs
//! Vault-wide content and tag edits.

use crate::core::extract::frontmatter_tags;
use crate::core::organize::sanitize;
use crate::error::VaultError;
use crate::models::{Action, FileRecord, FrontmatterEdit, FrontmatterStatus, Operation};
use log::debug;
use regex::{NoExpand, Regex, RegexBuilder};
use std::sync::LazyLock;

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run regex"));

fn build_pattern(find: &str, regex: bool, case_sensitive: bool) -> Result<Regex, VaultError> {
    if find.is_empty() {
        return Err(VaultError::InvalidPattern("search text is empty".to_owned()));
    }
    let source = if regex {
        find.to_owned()
    } else {
        regex::escape(find)
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| VaultError::InvalidPattern(err.to_string()))
}

/// Plans a body rewrite for every record containing `find`.
///
/// In regex mode `replace` may reference capture groups (`$1`, `${name}`);
/// otherwise it is inserted literally.
///
/// # Errors
///
/// Returns [`VaultError::InvalidPattern`] when `find` is empty or is not a
/// valid regular expression.
pub fn find_replace(
    records: &[FileRecord],
    find: &str,
    replace: &str,
    regex: bool,
    case_sensitive: bool,
) -> Result<Vec<Operation>, VaultError> {
    let pattern = build_pattern(find, regex, case_sensitive)?;

    Ok(records
        .iter()
        .filter_map(|record| {
            let count = pattern.find_iter(&record.content).count();
            if count == 0 {
                return None;
            }
            let content = if regex {
                pattern.replace_all(&record.content, replace)
            } else {
                pattern.replace_all(&record.content, NoExpand(replace))
            };
            (content != record.content).then(|| {
                Operation::new(
                    record.path.clone(),
                    Action::UpdateContent {
                        content: content.into_owned(),
                    },
                )
                .with_summary(format!("{count} replacement(s)"))
            })
        })
        .collect())
}

/// Tidies a note body: no trailing whitespace on any line, at most one blank
/// line in a row, and exactly one newline at the end. An all-blank body
/// becomes empty.
#[must_use]
pub fn tidy_body(body: &str) -> String {
    let trimmed: Vec<&str> = body.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    let collapsed = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    let content = collapsed.trim_end_matches('\n');
    if content.trim().is_empty() {
        String::new()
    } else {
        format!("{content}\n")
    }
}

/// Plans a [`tidy_body`] rewrite for every record whose body would change.
#[must_use]
pub fn cleanup(records: &[FileRecord]) -> Vec<Operation> {
    records
        .iter()
        .filter_map(|record| {
            let content = tidy_body(&record.content);
            (content != record.content).then(|| {
                Operation::new(record.path.clone(), Action::UpdateContent { content })
                    .with_summary("whitespace")
            })
        })
        .collect()
}

/// Plans adding `tag` to the `tags` property of every record lacking it.
///
/// The tag is sanitized and a leading `#` dropped. The tag is appended to the
/// tags found in the file when the operation runs, and a comma-separated
/// `tags` string is rewritten as a list.
///
/// # Errors
///
/// Returns [`VaultError::InvalidPattern`] when nothing is left of the tag
/// after sanitizing.
pub fn add_tag(records: &[FileRecord], tag: &str) -> Result<Vec<Operation>, VaultError> {
    let tag = sanitize(tag.trim().trim_start_matches('#'));
    if tag.is_empty() {
        return Err(VaultError::InvalidPattern("tag is empty".to_owned()));
    }

    Ok(records
        .iter()
        .filter_map(|record| {
            if record.frontmatter_status == FrontmatterStatus::Malformed {
                debug!("skipping {}: malformed frontmatter", record.path.display());
                return None;
            }
            if frontmatter_tags(&record.frontmatter)
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&tag))
            {
                return None;
            }
            Some(
                Operation::new(
                    record.path.clone(),
                    Action::UpdateFrontmatter {
                        edit: FrontmatterEdit::AddTag(tag.clone()),
                    },
                )
                .with_summary(format!("+#{tag}")),
            )
        })
        .collect())
}

/// Whether a note has neither body text nor frontmatter.
#[must_use]
pub fn is_empty_note(record: &FileRecord) -> bool {
    record.content.trim().is_empty() && record.frontmatter.is_empty()
}

/// Plans deleting every empty note.
#[must_use]
pub fn delete_empty(records: &[FileRecord]) -> Vec<Operation> {
    records
        .iter()
        .filter(|record| is_empty_note(record))
        .map(|record| Operation::new(record.path.clone(), Action::Delete).with_summary("empty"))
        .collect()
}
