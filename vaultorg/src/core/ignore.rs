// src/core/ignore.rs
pub mod loader;

pub use loader::{IGNORE_FILE_NAME, load_ignore_patterns};

use anyhow::{Context as _, Result, anyhow};
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
struct Rule {
    pattern: Pattern,
    negated: bool,
    /// Pattern contained a `/` and is matched against the path relative to
    /// the vault root instead of the bare file name.
    anchored: bool,
    dir_only: bool,
}

/// Gitignore-style exclusions read from a vault's `.vaultignore`.
///
/// The last matching rule decides, so a later `!pattern` re-includes what an
/// earlier rule excluded.
#[derive(Debug, Default)]
pub struct Patterns {
    rules: Vec<Rule>,
}

impl Patterns {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Adds one line of an ignore file.
    ///
    /// Supports `!` negation, a trailing `/` for directory-only rules, a
    /// leading `/` or any inner `/` to anchor at the vault root, and a single
    /// `{a,b}` alternation group.
    ///
    /// # Errors
    ///
    /// Returns an error if the line has an unclosed `{` group or is not a
    /// valid glob.
    pub fn add_pattern(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (line, negated) = line
            .strip_prefix('!')
            .map_or((line, false), |rest| (rest, true));
        let (line, dir_only) = line
            .strip_suffix('/')
            .map_or((line, false), |rest| (rest, true));
        let anchored = line.contains('/');
        let line = line.trim_start_matches('/');

        for expanded in expand_group(line)? {
            let pattern = Pattern::new(&expanded)
                .with_context(|| format!("Invalid ignore pattern: {expanded}"))?;
            self.rules.push(Rule {
                pattern,
                negated,
                anchored,
                dir_only,
            });
        }
        Ok(())
    }

    /// Whether a path relative to the vault root is ignored, either itself or
    /// through one of its parent directories.
    #[must_use]
    pub fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        let components: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        (1..=components.len()).any(|end| {
            let is_last = end == components.len();
            components
                .get(..end)
                .is_some_and(|prefix| self.decide(prefix, !is_last || is_dir))
        })
    }

    fn decide(&self, components: &[String], is_dir: bool) -> bool {
        let Some(name) = components.last() else {
            return false;
        };
        let joined = components.join("/");

        let mut ignored = false;
        for rule in &self.rules {
            if rule.dir_only && !is_dir {
                continue;
            }
            let candidate = if rule.anchored { &joined } else { name };
            if rule.pattern.matches_with(candidate, MATCH_OPTIONS) {
                ignored = !rule.negated;
            }
        }
        ignored
    }
}

fn expand_group(pattern: &str) -> Result<Vec<String>> {
    let Some((prefix, rest)) = pattern.split_once('{') else {
        return Ok(vec![pattern.to_owned()]);
    };
    let (alternatives, suffix) = rest
        .split_once('}')
        .ok_or_else(|| anyhow!("Unclosed brace in ignore pattern: {pattern}"))?;
    Ok(alternatives
        .split(',')
        .map(|alt| format!("{prefix}{}{suffix}", alt.trim()))
        .collect())
}
