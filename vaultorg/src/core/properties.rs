// src/core/properties.rs
//! Frontmatter property strategies.
//!
//! All strategies take a mapping and return a new one together with a list of
//! what changed. None of them fail: a value that cannot be normalized is left
//! as it is and shows up later through [`validate`].

use crate::models::{
    Action, FileRecord, Frontmatter, FrontmatterEdit, FrontmatterStatus, Operation, Value,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

pub use crate::models::PropertySteps;

/// Shape a canonical property is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Date,
    Array,
    Number,
}

impl PropertyType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Array => "array",
            Self::Number => "number",
        }
    }
}

#[derive(Debug)]
struct Canonical {
    name: &'static str,
    kind: PropertyType,
    aliases: &'static [&'static str],
}

const CANONICAL: [Canonical; 10] = [
    Canonical {
        name: "title",
        kind: PropertyType::String,
        aliases: &["name", "heading", "note-title"],
    },
    Canonical {
        name: "created",
        kind: PropertyType::Date,
        aliases: &[
            "date-created",
            "dateCreated",
            "creation-date",
            "created-at",
            "createdAt",
            "created_on",
            "date",
        ],
    },
    Canonical {
        name: "modified",
        kind: PropertyType::Date,
        aliases: &[
            "date-modified",
            "dateModified",
            "modification-date",
            "last-modified",
            "lastModified",
            "updated",
            "updated-at",
            "updatedAt",
        ],
    },
    Canonical {
        name: "author",
        kind: PropertyType::String,
        aliases: &["authors", "writer", "creator", "by"],
    },
    Canonical {
        name: "tags",
        kind: PropertyType::Array,
        aliases: &["tag", "categories", "category", "keywords"],
    },
    Canonical {
        name: "type",
        kind: PropertyType::String,
        aliases: &["kind", "note-type", "noteType"],
    },
    Canonical {
        name: "status",
        kind: PropertyType::String,
        aliases: &["state", "stage"],
    },
    Canonical {
        name: "priority",
        kind: PropertyType::Number,
        aliases: &["prio", "importance"],
    },
    Canonical {
        name: "description",
        kind: PropertyType::String,
        aliases: &["desc", "summary", "abstract"],
    },
    Canonical {
        name: "source",
        kind: PropertyType::String,
        aliases: &["url", "link", "origin", "reference"],
    },
];

/// Canonical order used by [`sort_properties`].
pub const CANONICAL_ORDER: [&str; 10] = [
    "title",
    "created",
    "modified",
    "author",
    "tags",
    "type",
    "status",
    "priority",
    "description",
    "source",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A key renamed by [`standardize_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub from: String,
    pub to: String,
}

/// A value rewritten by [`clean_values`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub property: String,
    pub from: Value,
    pub to: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

/// Lowercase ASCII alphanumerics only, so `Pri-ority` and `PRIORITY ` both
/// become `priority`. Only canonical names are compared in this form, never
/// aliases.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup(key: &str) -> Option<&'static Canonical> {
    CANONICAL
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(key))
        .or_else(|| {
            CANONICAL
                .iter()
                .find(|c| c.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(key)))
        })
        .or_else(|| {
            let normalized = normalize_key(key);
            CANONICAL.iter().find(|c| c.name == normalized)
        })
}

/// Canonical name a key resolves to, if any.
#[must_use]
pub fn canonical_name(key: &str) -> Option<&'static str> {
    lookup(key).map(|c| c.name)
}

/// Expected type of a property, looked up through [`canonical_name`].
#[must_use]
pub fn property_type(key: &str) -> Option<PropertyType> {
    lookup(key).map(|c| c.kind)
}

/// Parses the date formats commonly found in notes.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Renames keys to their canonical names.
///
/// A key is left alone when its canonical name is already taken, either by
/// an existing key or by an earlier rename, so no value is ever dropped.
#[must_use]
pub fn standardize_names(frontmatter: &Frontmatter) -> (Frontmatter, Vec<Mapping>) {
    let mut standardized = Frontmatter::new();
    let mut mappings = Vec::new();

    for (key, value) in frontmatter.iter() {
        let target = match canonical_name(key) {
            Some(canonical)
                if canonical != key
                    && !frontmatter.contains_key(canonical)
                    && !standardized.contains_key(canonical) =>
            {
                mappings.push(Mapping {
                    from: key.to_owned(),
                    to: canonical.to_owned(),
                });
                canonical
            }
            _ => key,
        };
        standardized.insert(target, value.clone());
    }

    (standardized, mappings)
}

fn clean_value(kind: PropertyType, value: &Value) -> Option<Value> {
    let Value::String(text) = value else {
        return None;
    };
    match kind {
        PropertyType::Date => {
            parse_date(text).map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
        }
        PropertyType::Array => Some(Value::List(
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        )),
        PropertyType::Number => parse_number(text).map(Value::Number),
        PropertyType::String => None,
    }
}

/// Normalizes values of known properties: dates to `YYYY-MM-DD`,
/// comma-separated strings to arrays and numeric strings to numbers.
#[must_use]
pub fn clean_values(frontmatter: &Frontmatter) -> (Frontmatter, Vec<ValueChange>) {
    let mut cleaned = Frontmatter::new();
    let mut changes = Vec::new();

    for (key, value) in frontmatter.iter() {
        let normalized = property_type(key)
            .and_then(|kind| clean_value(kind, value))
            .filter(|normalized| normalized != value);
        match normalized {
            Some(normalized) => {
                changes.push(ValueChange {
                    property: key.to_owned(),
                    from: value.clone(),
                    to: normalized.clone(),
                });
                cleaned.insert(key, normalized);
            }
            None => {
                cleaned.insert(key, value.clone());
            }
        }
    }

    (cleaned, changes)
}

/// Adds `created`, `modified` and an empty `tags` list when the key is
/// missing entirely. Present keys are never touched, even when empty.
#[must_use]
pub fn add_missing(
    frontmatter: &Frontmatter,
    created: Option<NaiveDate>,
    modified: Option<NaiveDate>,
) -> (Frontmatter, Vec<&'static str>) {
    let mut completed = frontmatter.clone();
    let mut additions = Vec::new();

    for (key, date) in [("created", created), ("modified", modified)] {
        if let Some(date) = date {
            if !completed.contains_key(key) {
                completed.insert(key, Value::String(date.format("%Y-%m-%d").to_string()));
                additions.push(key);
            }
        }
    }
    if !completed.contains_key("tags") {
        completed.insert("tags", Value::List(Vec::new()));
        additions.push("tags");
    }

    (completed, additions)
}

/// Canonical keys first in [`CANONICAL_ORDER`], then everything else in its
/// original order.
#[must_use]
pub fn sort_properties(frontmatter: &Frontmatter) -> Frontmatter {
    let canonical = CANONICAL_ORDER
        .iter()
        .filter_map(|key| frontmatter.get(key).map(|value| ((*key).to_owned(), value.clone())));
    let others = frontmatter
        .iter()
        .filter(|(key, _)| !CANONICAL_ORDER.contains(key))
        .map(|(key, value)| (key.to_owned(), value.clone()));
    canonical.chain(others).collect()
}

/// Checks a value against the expected shape of its property. Unknown
/// properties and null values are always valid.
#[must_use]
pub fn validate(property: &str, value: &Value) -> Validation {
    let mut issues = Vec::new();
    if let Some(kind) = property_type(property) {
        let ok = match (kind, value) {
            (_, Value::Null) | (PropertyType::Array, Value::List(_)) => true,
            (PropertyType::Date, Value::String(text)) => parse_date(text).is_some(),
            (PropertyType::String, Value::String(_)) | (PropertyType::Number, Value::Number(_)) => true,
            (PropertyType::Number, Value::String(text)) => parse_number(text).is_some(),
            _ => false,
        };
        if !ok {
            issues.push(format!(
                "{property}: expected {}, found {} '{value}'",
                kind.name(),
                value.type_name()
            ));
        }
    }
    Validation {
        is_valid: issues.is_empty(),
        issues,
    }
}

/// Runs the selected steps over one mapping. Returns the result and a short
/// description of what happened.
#[must_use]
pub fn apply_steps(
    frontmatter: &Frontmatter,
    steps: PropertySteps,
    created: Option<NaiveDate>,
    modified: Option<NaiveDate>,
) -> (Frontmatter, Vec<String>) {
    let mut current = frontmatter.clone();
    let mut notes = Vec::new();

    if steps.standardize {
        let (next, mappings) = standardize_names(&current);
        if !mappings.is_empty() {
            notes.push(format!("{} renamed", mappings.len()));
        }
        current = next;
    }
    if steps.clean {
        let (next, changes) = clean_values(&current);
        if !changes.is_empty() {
            notes.push(format!("{} cleaned", changes.len()));
        }
        current = next;
    }
    if steps.add_missing {
        let (next, additions) = add_missing(&current, created, modified);
        if !additions.is_empty() {
            notes.push(format!("{} added", additions.len()));
        }
        current = next;
    }
    if steps.sort {
        let next = sort_properties(&current);
        if next != current {
            notes.push("sorted".to_owned());
        }
        current = next;
    }

    (current, notes)
}

/// Plans one property update per record whose properties change.
///
/// The steps are re-run on the file as it is when the operation is applied,
/// so keys edited after the scan are kept. Files whose frontmatter block
/// could not be parsed are skipped.
#[must_use]
pub fn plan_properties(records: &[FileRecord], steps: PropertySteps) -> Vec<Operation> {
    records
        .iter()
        .filter_map(|record| {
            if record.frontmatter_status == FrontmatterStatus::Malformed {
                debug!("skipping {}: malformed frontmatter", record.path.display());
                return None;
            }
            let created = record.created.map(|d| d.date_naive());
            let modified = record.modified.map(|d| d.date_naive());
            let (frontmatter, notes) = apply_steps(&record.frontmatter, steps, created, modified);
            (frontmatter != record.frontmatter).then(|| {
                Operation::new(
                    record.path.clone(),
                    Action::UpdateFrontmatter {
                        edit: FrontmatterEdit::Properties {
                            steps,
                            created,
                            modified,
                        },
                    },
                )
                .with_summary(notes.join(", "))
            })
        })
        .collect()
}
