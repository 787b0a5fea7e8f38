// src/core/extract.rs
//! Metadata extraction from raw note text.
//!
//! Everything here is a pure function over a string: frontmatter, tags,
//! headings, links and a word count. Fenced code blocks are ignored for tags,
//! headings and word counts so that shell comments and `#include` lines do not
//! leak into note metadata.

use crate::core::frontmatter::parse_document;
use crate::models::{Frontmatter, FrontmatterStatus, Heading, Link, Value};
use regex::Regex;
use std::sync::LazyLock;

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced code regex"));
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]*`").expect("valid inline code regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w&/#])#([\w-]+)").expect("valid tag regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.+)$").expect("valid heading regex"));
static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*?)\]\(([^)]*?)\)").expect("valid link regex"));
static WIKI_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("valid wikilink regex")
});
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[*~]+|(?:^|[^\w])_+|_+(?:[^\w]|$)|^#{1,6}\s").expect("valid emphasis regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub frontmatter: Frontmatter,
    pub frontmatter_status: FrontmatterStatus,
    /// Body text with the frontmatter block removed.
    pub content: String,
    pub tags: Vec<String>,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub word_count: usize,
}

/// Extracts all metadata from a note's raw text. Never fails.
#[must_use]
pub fn extract(raw: &str) -> Metadata {
    let document = parse_document(raw);
    let body = document.body;
    let without_code = strip_fenced_code(body);

    let tags = merge_tags(
        frontmatter_tags(&document.frontmatter),
        extract_inline_tags(&without_code),
    );

    Metadata {
        tags,
        headings: extract_headings(&without_code),
        links: extract_links(body),
        word_count: count_words(body),
        content: body.to_owned(),
        frontmatter: document.frontmatter,
        frontmatter_status: document.status,
    }
}

fn strip_fenced_code(text: &str) -> String {
    FENCED_CODE_RE.replace_all(text, "").into_owned()
}

/// Tags declared in frontmatter, either as a list or a comma-separated string.
#[must_use]
pub fn frontmatter_tags(frontmatter: &Frontmatter) -> Vec<String> {
    let raw: Vec<String> = match frontmatter.get("tags") {
        Some(Value::List(items)) => items.clone(),
        Some(Value::String(s)) => s.split(',').map(str::to_owned).collect(),
        _ => Vec::new(),
    };
    raw.iter()
        .map(|tag| tag.trim().trim_start_matches('#').to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[must_use]
pub fn extract_inline_tags(text: &str) -> Vec<String> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Frontmatter tags first, then inline tags, without duplicates.
fn merge_tags(declared: Vec<String>, inline: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(declared.len().saturating_add(inline.len()));
    for tag in declared.into_iter().chain(inline) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[must_use]
pub fn extract_headings(text: &str) -> Vec<Heading> {
    HEADING_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
            let text = caps.get(2)?.as_str().trim().to_owned();
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .collect()
}

/// Markdown links in document order, followed by wikilinks in document order.
#[must_use]
pub fn extract_links(text: &str) -> Vec<Link> {
    let markdown = MARKDOWN_LINK_RE.captures_iter(text).map(|caps| Link::Markdown {
        text: caps.get(1).map_or("", |m| m.as_str()).to_owned(),
        url: caps.get(2).map_or("", |m| m.as_str()).to_owned(),
    });
    let wiki = WIKI_LINK_RE.captures_iter(text).map(|caps| {
        let page = caps.get(1).map_or("", |m| m.as_str()).trim().to_owned();
        let text = caps
            .get(2)
            .map_or_else(|| page.clone(), |m| m.as_str().trim().to_owned());
        Link::Wiki { page, text }
    });
    markdown.chain(wiki).collect()
}

/// Counts words in a body, ignoring code and markdown syntax.
#[must_use]
pub fn count_words(body: &str) -> usize {
    let text = strip_fenced_code(body);
    let text = INLINE_CODE_RE.replace_all(&text, " ");
    let text = WIKI_LINK_RE.replace_all(&text, |caps: &regex::Captures<'_>| {
        caps.get(2)
            .or_else(|| caps.get(1))
            .map_or_else(String::new, |m| m.as_str().to_owned())
    });
    let text = MARKDOWN_LINK_RE.replace_all(&text, "$1");

    text.lines()
        .map(|line| EMPHASIS_RE.replace_all(line, " "))
        .map(|line| line.split_whitespace().count())
        .sum()
}
