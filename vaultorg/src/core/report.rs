// src/core/report.rs
//! Vault health report: per-file issues and property statistics.

use crate::core::batch::is_empty_note;
use crate::core::properties::{canonical_name, normalize_key, validate};
use crate::core::scanner::ScanOutcome;
use crate::models::{FileRecord, FrontmatterStatus};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Lines longer than this many characters are reported.
pub const LONG_LINE_LIMIT: usize = 1000;

/// Distinct example values kept per property.
const MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    EmptyFile,
    MalformedFrontmatter,
    LongLine { line: usize, length: usize },
    MissingTitle,
    InvalidValue(String),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFile => f.write_str("file is empty"),
            Self::MalformedFrontmatter => f.write_str("frontmatter could not be parsed"),
            Self::LongLine { line, length } => {
                write!(f, "line {line} is {length} characters long")
            }
            Self::MissingTitle => f.write_str("no title property and no top-level heading"),
            Self::InvalidValue(detail) => f.write_str(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssues {
    pub path: PathBuf,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyStats {
    /// Number of files that set the property.
    pub count: usize,
    pub types: BTreeSet<&'static str>,
    pub examples: Vec<String>,
}

impl PropertyStats {
    /// Observed types other than null.
    fn concrete_types(&self) -> Vec<&'static str> {
        self.types.iter().copied().filter(|t| *t != "null").collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// The same property holds values of different types across files.
    MixedTypes {
        property: String,
        types: Vec<&'static str>,
    },
    /// Differently spelled names for what is probably one property.
    SimilarNames { canonical: String, names: Vec<String> },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedTypes { property, types } => {
                write!(f, "'{property}' has mixed types: {}", types.join(", "))
            }
            Self::SimilarNames { canonical, names } => {
                write!(f, "similar names for '{canonical}': {}", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct VaultReport {
    pub total_files: usize,
    pub processed_files: usize,
    /// Files that could not be read, with the reason.
    pub errors: Vec<(PathBuf, String)>,
    /// Only files with at least one issue.
    pub file_issues: Vec<FileIssues>,
    pub properties: BTreeMap<String, PropertyStats>,
    pub inconsistencies: Vec<Inconsistency>,
}

impl VaultReport {
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.file_issues.iter().map(|f| f.issues.len()).sum()
    }
}

/// Issues found in a single note.
#[must_use]
pub fn file_issues(record: &FileRecord) -> Vec<Issue> {
    let mut issues = Vec::new();

    if is_empty_note(record) {
        issues.push(Issue::EmptyFile);
    }
    if record.frontmatter_status == FrontmatterStatus::Malformed {
        issues.push(Issue::MalformedFrontmatter);
    }
    for (index, line) in record.content.lines().enumerate() {
        let length = line.chars().count();
        if length > LONG_LINE_LIMIT {
            issues.push(Issue::LongLine {
                line: index.saturating_add(1),
                length,
            });
        }
    }
    if record.title().is_none() && !record.headings.iter().any(|h| h.level == 1) {
        issues.push(Issue::MissingTitle);
    }
    for (key, value) in record.frontmatter.iter() {
        issues.extend(validate(key, value).issues.into_iter().map(Issue::InvalidValue));
    }

    issues
}

fn collect_properties(records: &[FileRecord]) -> BTreeMap<String, PropertyStats> {
    let mut properties: BTreeMap<String, PropertyStats> = BTreeMap::new();
    for record in records {
        for (key, value) in record.frontmatter.iter() {
            let stats = properties.entry(key.to_owned()).or_default();
            stats.count = stats.count.saturating_add(1);
            stats.types.insert(value.type_name());
            let example = value.to_string();
            if stats.examples.len() < MAX_EXAMPLES && !value.is_blank() && !stats.examples.contains(&example) {
                stats.examples.push(example);
            }
        }
    }
    properties
}

fn find_inconsistencies(properties: &BTreeMap<String, PropertyStats>) -> Vec<Inconsistency> {
    let mut inconsistencies: Vec<Inconsistency> = properties
        .iter()
        .filter_map(|(property, stats)| {
            let types = stats.concrete_types();
            (types.len() > 1).then(|| Inconsistency::MixedTypes {
                property: property.clone(),
                types,
            })
        })
        .collect();

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in properties.keys() {
        let canonical = canonical_name(name).map_or_else(|| normalize_key(name), str::to_owned);
        groups.entry(canonical).or_default().push(name.clone());
    }
    inconsistencies.extend(
        groups
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(canonical, names)| Inconsistency::SimilarNames { canonical, names }),
    );

    inconsistencies
}

/// Aggregates a scan into a report.
#[must_use]
pub fn build_report(outcome: &ScanOutcome) -> VaultReport {
    let file_issues = outcome
        .records
        .iter()
        .filter_map(|record| {
            let issues = file_issues(record);
            (!issues.is_empty()).then(|| FileIssues {
                path: record.path.clone(),
                issues,
            })
        })
        .collect();
    let properties = collect_properties(&outcome.records);

    VaultReport {
        total_files: outcome.total(),
        processed_files: outcome.records.len(),
        errors: outcome
            .errors
            .iter()
            .map(|(path, err)| (path.clone(), err.to_string()))
            .collect(),
        file_issues,
        inconsistencies: find_inconsistencies(&properties),
        properties,
    }
}

/// Renders a report as plain text.
#[must_use]
pub fn render(report: &VaultReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &VaultReport) -> fmt::Result {
    writeln!(out, "Vault report")?;
    writeln!(out, "{:-<60}", "")?;
    writeln!(out, "{:<24} {:>8}", "Total files", report.total_files)?;
    writeln!(out, "{:<24} {:>8}", "Processed", report.processed_files)?;
    writeln!(out, "{:<24} {:>8}", "Errors", report.errors.len())?;
    writeln!(out, "{:<24} {:>8}", "Files with issues", report.file_issues.len())?;
    writeln!(out, "{:<24} {:>8}", "Issues", report.issue_count())?;

    if !report.properties.is_empty() {
        writeln!(out)?;
        writeln!(out, "Properties")?;
        writeln!(out, "{:<24} {:>6}  {:<20} {}", "NAME", "FILES", "TYPES", "EXAMPLES")?;
        writeln!(out, "{:-<60}", "")?;
        for (name, stats) in &report.properties {
            let types: Vec<&str> = stats.types.iter().copied().collect();
            writeln!(
                out,
                "{:<24} {:>6}  {:<20} {}",
                name,
                stats.count,
                types.join(", "),
                stats.examples.join(" | ")
            )?;
        }
    }

    if !report.inconsistencies.is_empty() {
        writeln!(out)?;
        writeln!(out, "Inconsistencies")?;
        for inconsistency in &report.inconsistencies {
            writeln!(out, "  - {inconsistency}")?;
        }
    }

    if !report.errors.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unreadable files")?;
        for (path, err) in &report.errors {
            writeln!(out, "  {}: {err}", path.display())?;
        }
    }

    for file in &report.file_issues {
        writeln!(out)?;
        writeln!(out, "{}", file.path.display())?;
        for issue in &file.issues {
            writeln!(out, "  - {issue}")?;
        }
    }

    Ok(())
}
