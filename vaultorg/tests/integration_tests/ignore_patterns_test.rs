// tests/integration_tests/ignore_patterns_test.rs
use super::common::{create_ignore_file, create_test_file, setup_test_vault};
use anyhow::Result;
use std::path::Path;
use vaultorg::core::ignore::load_ignore_patterns;
use vaultorg::{Config, Scanner};

#[test]
fn test_ignore_patterns() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    create_ignore_file(
        temp_dir.path(),
        &[
            "# Comment line",
            "templates/",
            "*.draft.md",
            "!keep.draft.md",
            "/Ideas.md",
            "*.{bak,tmp}",
        ],
    )?;

    let patterns = load_ignore_patterns(temp_dir.path())?;

    assert!(patterns.matches(Path::new("templates"), true), "Should match templates/");
    assert!(
        patterns.matches(Path::new("templates/daily.md"), false),
        "Files below an ignored directory are ignored"
    );
    assert!(patterns.matches(Path::new("Journal/plan.draft.md"), false));
    assert!(
        !patterns.matches(Path::new("keep.draft.md"), false),
        "Should respect negation pattern"
    );
    assert!(patterns.matches(Path::new("Ideas.md"), false));
    assert!(
        !patterns.matches(Path::new("Journal/Ideas.md"), false),
        "A leading slash anchors the pattern to the vault root"
    );
    assert!(patterns.matches(Path::new("old.bak"), false));
    assert!(patterns.matches(Path::new("x.tmp"), false));
    assert!(!patterns.matches(Path::new("Meeting Notes.md"), false));
    Ok(())
}

#[test]
fn test_scanner_applies_ignore_file() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    create_test_file(temp_dir.path(), "Journal/plan.draft.md", "draft")?;
    create_test_file(temp_dir.path(), "keep.draft.md", "kept")?;
    create_ignore_file(temp_dir.path(), &["templates/", "*.draft.md", "!keep.draft.md"])?;

    let files = Scanner::for_vault(temp_dir.path(), &Config::default())?.markdown_files();
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.strip_prefix(temp_dir.path()).ok())
        .map(|p| p.display().to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "Ideas.md",
            "Journal/2024-01-05.md",
            "Meeting Notes.md",
            "empty.md",
            "keep.draft.md",
        ]
    );
    Ok(())
}

#[test]
fn test_invalid_ignore_pattern_is_an_error() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    create_ignore_file(temp_dir.path(), &["*.{md"])?;

    assert!(load_ignore_patterns(temp_dir.path()).is_err());
    assert!(Scanner::for_vault(temp_dir.path(), &Config::default()).is_err());
    Ok(())
}
