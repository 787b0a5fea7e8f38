// tests/integration_tests/scanning_test.rs
use super::common::{IDEAS, create_test_file, setup_test_vault};
use anyhow::Result;
use std::path::Path;
use tempfile::TempDir;
use vaultorg::models::{FrontmatterStatus, Link};
use vaultorg::{Config, Scanner, analyze, build_record, list_directories, list_markdown_files};

fn relative_names(files: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    files
        .iter()
        .filter_map(|p| p.strip_prefix(root).ok())
        .map(|p| p.display().to_string())
        .collect()
}

#[test]
fn test_analyze_vault() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let vault = analyze(temp_dir.path());

    assert!(vault.is_vault);
    assert!(vault.has_obsidian_folder);
    assert_eq!(
        vault.markdown_file_count, 5,
        "node_modules and .git notes are not counted"
    );
    Ok(())
}

#[test]
fn test_empty_directory_is_not_a_vault() -> Result<()> {
    let temp_dir = TempDir::new()?;
    create_test_file(temp_dir.path(), "notes.txt", "plain text")?;

    let vault = analyze(temp_dir.path());
    assert!(!vault.is_vault);
    assert_eq!(vault.markdown_file_count, 0);
    Ok(())
}

#[test]
fn test_listing() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();

    assert_eq!(
        relative_names(&list_markdown_files(root)?, root),
        vec![
            "Ideas.md",
            "Journal/2024-01-05.md",
            "Meeting Notes.md",
            "empty.md",
            "templates/daily.md",
        ]
    );
    assert_eq!(
        relative_names(&list_directories(root)?, root),
        vec!["Journal", "attachments", "templates"]
    );
    Ok(())
}

#[test]
fn test_scan_with_configured_excludes() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let config = Config {
        exclude: vec!["templates".to_owned()],
        ..Config::default()
    };

    let outcome = Scanner::for_vault(temp_dir.path(), &config)?.scan();
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.records.len(), 4);
    assert!(
        outcome
            .records
            .iter()
            .all(|r| !r.path.starts_with(temp_dir.path().join("templates")))
    );
    Ok(())
}

#[test]
fn test_record_from_disk() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let record = build_record(&temp_dir.path().join("Meeting Notes.md"))?;

    assert_eq!(record.name, "Meeting Notes");
    assert_eq!(record.extension(), ".md");
    assert_eq!(record.frontmatter_status, FrontmatterStatus::Parsed);
    assert_eq!(record.title(), Some("Weekly Sync"));
    assert_eq!(record.tags, vec!["followup"]);
    assert_eq!(
        record.first_heading().map(|h| h.text.as_str()),
        Some("Team Meeting")
    );
    assert_eq!(
        record.links,
        vec![Link::Wiki {
            page: "Roadmap".to_owned(),
            text: "Roadmap".to_owned()
        }]
    );
    assert!(record.modified.is_some());
    assert_eq!(record.size, u64::try_from(super::common::MEETING.len())?);
    Ok(())
}

#[test]
fn test_tags_union_frontmatter_and_inline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = create_test_file(
        temp_dir.path(),
        "tags.md",
        "---\ntags: [\"tag2\", \"tag3\"]\n---\ncontent with #tag1 and #tag2",
    )?;

    let mut tags = build_record(&path)?.tags;
    tags.sort();
    assert_eq!(tags, vec!["tag1", "tag2", "tag3"]);

    let ideas = create_test_file(temp_dir.path(), "ideas.md", IDEAS)?;
    assert_eq!(build_record(&ideas)?.tags, vec!["ideas", "rust"]);
    Ok(())
}
