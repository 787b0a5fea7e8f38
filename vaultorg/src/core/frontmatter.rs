// src/core/frontmatter.rs
use crate::models::frontmatter::format_number;
use crate::models::{Frontmatter, FrontmatterStatus, Value};
use log::debug;
use serde_yaml_ng::Value as YamlValue;

const DELIMITER: &str = "---";

/// A raw document cut at its frontmatter delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Text between the delimiters, if a block was found.
    pub block: Option<&'a str>,
    /// Everything up to and including the closing delimiter line.
    pub prefix: &'a str,
    pub body: &'a str,
}

/// A parsed document: frontmatter map plus body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub frontmatter: Frontmatter,
    pub status: FrontmatterStatus,
    pub body: &'a str,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

/// Splits `raw` into frontmatter block and body.
///
/// The block must open on the very first line with a line that is exactly
/// `---` and close on the next such line. Without a closing line the whole
/// text is body.
#[must_use]
pub fn split(raw: &str) -> Split<'_> {
    let no_block = Split {
        block: None,
        prefix: "",
        body: raw,
    };

    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return no_block;
    };
    if !is_delimiter(first) {
        return no_block;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let end = offset.saturating_add(line.len());
            return Split {
                block: raw.get(block_start..offset),
                prefix: raw.get(..end).unwrap_or_default(),
                body: raw.get(end..).unwrap_or_default(),
            };
        }
        offset = offset.saturating_add(line.len());
    }

    no_block
}

/// Parses a whole document. Never fails: a block that cannot be understood
/// yields empty frontmatter, [`FrontmatterStatus::Malformed`] and the whole
/// text as body.
#[must_use]
pub fn parse_document(raw: &str) -> Document<'_> {
    let parts = split(raw);
    let Some(block) = parts.block else {
        return Document {
            frontmatter: Frontmatter::new(),
            status: FrontmatterStatus::Absent,
            body: raw,
        };
    };

    let (frontmatter, status) = parse_block(block);
    let body = if status == FrontmatterStatus::Malformed {
        raw
    } else {
        parts.body
    };
    Document {
        frontmatter,
        status,
        body,
    }
}

/// Parses the text between the delimiters: YAML first, then line by line.
#[must_use]
pub fn parse_block(block: &str) -> (Frontmatter, FrontmatterStatus) {
    match serde_yaml_ng::from_str::<YamlValue>(block) {
        Ok(YamlValue::Mapping(mapping)) => {
            let frontmatter = mapping
                .into_iter()
                .map(|(key, value)| (yaml_key(key), from_yaml(value)))
                .collect();
            return (frontmatter, FrontmatterStatus::Parsed);
        }
        Ok(YamlValue::Null) => return (Frontmatter::new(), FrontmatterStatus::Parsed),
        Ok(_) => debug!("frontmatter block is not a mapping, falling back to line parsing"),
        Err(err) => debug!("frontmatter YAML rejected ({err}), falling back to line parsing"),
    }

    parse_lines(block).map_or(
        (Frontmatter::new(), FrontmatterStatus::Malformed),
        |frontmatter| (frontmatter, FrontmatterStatus::Recovered),
    )
}

fn yaml_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        other => from_yaml(other).to_string(),
    }
}

fn from_yaml(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            Value::List(items.into_iter().filter_map(list_item).collect())
        }
        YamlValue::Tagged(tagged) => from_yaml(tagged.value),
        mapping @ YamlValue::Mapping(_) => Value::String(
            serde_yaml_ng::to_string(&mapping)
                .map(|s| s.trim().to_owned())
                .unwrap_or_default(),
        ),
    }
}

fn list_item(value: YamlValue) -> Option<String> {
    match from_yaml(value) {
        Value::Null => None,
        Value::List(items) => Some(items.join(", ")),
        other => Some(other.to_string()),
    }
}

/// Line-based recovery for blocks YAML rejects. Returns `None` when no line
/// carries a `key:` separator.
fn parse_lines(block: &str) -> Option<Frontmatter> {
    let mut frontmatter = Frontmatter::new();
    let mut last_key: Option<String> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let (Some(item), Some(key)) = (trimmed.strip_prefix('-'), last_key.as_deref()) {
            let item = coerce(item.trim()).to_string();
            match frontmatter.get(key) {
                Some(Value::List(items)) => {
                    let mut items = items.clone();
                    items.push(item);
                    frontmatter.insert(key, Value::List(items));
                }
                Some(Value::Null) => {
                    frontmatter.insert(key, Value::List(vec![item]));
                }
                _ => {}
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        frontmatter.insert(key, coerce(value.trim()));
        last_key = Some(key.to_owned());
    }

    (!frontmatter.is_empty()).then_some(frontmatter)
}

fn unquote(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find(|q| raw.starts_with(*q) && raw.ends_with(*q))
        .and_then(|_| raw.get(1..raw.len().saturating_sub(1)))
}

fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty()
        && raw.chars().any(|c| c.is_ascii_digit())
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

/// Coerces a raw scalar the way the line parser reads values: quoted string,
/// boolean, null, inline list, number, otherwise plain string. Date-shaped
/// strings stay strings.
#[must_use]
pub fn coerce(raw: &str) -> Value {
    let raw = raw.trim();
    if let Some(inner) = unquote(raw) {
        return Value::String(inner.to_owned());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "" | "null" | "~" => return Value::Null,
        _ => {}
    }
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| coerce(item).to_string())
            .collect();
        return Value::List(items);
    }
    if looks_numeric(raw) {
        if let Ok(n) = raw.parse::<f64>() {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_owned())
}

/// Whether YAML reads `s` back as this exact string. YAML resolves more plain
/// spellings than [`coerce`] does (`True`, `NULL`, `0x10`, `.inf`).
fn reads_back_as_string(s: &str) -> bool {
    matches!(
        serde_yaml_ng::from_str::<YamlValue>(s),
        Ok(YamlValue::String(ref parsed)) if parsed == s
    )
}

fn needs_quotes(s: &str, in_list: bool) -> bool {
    const LEADING: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];
    s.is_empty()
        || s != s.trim()
        || s.starts_with(LEADING)
        || s.ends_with(':')
        || s.contains(": ")
        || s.contains(" #")
        || s.contains('\n')
        || (in_list && s.contains([',', '[', ']', '{', '}']))
        || !matches!(coerce(s), Value::String(ref parsed) if parsed == s)
        || !reads_back_as_string(s)
}

fn quote(s: &str) -> String {
    if s.contains('\n') || s.contains('\\') {
        let escaped = s
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("\"{escaped}\"")
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}

fn format_scalar(s: &str, in_list: bool) -> String {
    if needs_quotes(s, in_list) {
        quote(s)
    } else {
        s.to_owned()
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format_scalar(s, false),
        Value::Number(n) if n.is_nan() => ".nan".to_owned(),
        Value::Number(n) if n.is_infinite() => {
            if n.is_sign_positive() { ".inf" } else { "-.inf" }.to_owned()
        }
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(|item| format_scalar(item, true)).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// Writes frontmatter and body back into one document. Empty frontmatter
/// produces no block at all.
#[must_use]
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> String {
    if frontmatter.is_empty() {
        return body.to_owned();
    }

    let mut out = String::from("---\n");
    for (key, value) in frontmatter.iter() {
        out.push_str(&format_scalar(key, false));
        out.push(':');
        let value = format_value(value);
        if !value.is_empty() {
            out.push(' ');
            out.push_str(&value);
        }
        out.push('\n');
    }
    out.push_str("---\n");
    out.push_str(body);
    out
}
