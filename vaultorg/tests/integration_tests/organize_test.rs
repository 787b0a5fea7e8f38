// tests/integration_tests/organize_test.rs
use super::common::setup_test_vault;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use vaultorg::core::organize::{ORGANIZED_DIR, RenamePattern, Strategy, plan_organize, plan_rename};
use vaultorg::{Config, Engine, Scanner, VaultError, list_markdown_files};

fn today() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 6, 15).ok_or_else(|| anyhow::anyhow!("invalid date"))
}

#[test]
fn test_organize_by_type_moves_into_organized_tree() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let config = Config {
        exclude: vec!["templates".to_owned()],
        ..Config::default()
    };
    let records = Scanner::for_vault(root, &config)?.scan().records;

    let operations = plan_organize(&records, root, &Strategy::ByType, today()?)?;
    let summaries: Vec<(String, Option<String>)> = operations
        .iter()
        .map(|op| (op.label(), op.summary.clone()))
        .collect();
    assert_eq!(
        summaries,
        vec![
            ("Ideas.md".to_owned(), Some("by-type/notes".to_owned())),
            ("2024-01-05.md".to_owned(), Some("by-type/journal".to_owned())),
            ("Meeting Notes.md".to_owned(), Some("by-type/meetings".to_owned())),
            ("empty.md".to_owned(), Some("by-type/notes".to_owned())),
        ]
    );

    let report = Engine::local().apply(&operations, |_, _, _| {});
    assert!(report.is_clean());
    assert!(
        root.join(ORGANIZED_DIR)
            .join("by-type/meetings/Meeting Notes.md")
            .is_file()
    );

    let remaining = list_markdown_files(root)?;
    assert_eq!(
        remaining,
        vec![root.join("templates/daily.md")],
        "Organized output is not scanned again"
    );
    Ok(())
}

#[test]
fn test_organize_by_size_and_custom() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let records = Scanner::new(root)?.scan().records;

    let by_size = plan_organize(&records, root, &Strategy::BySize, today()?)?;
    assert_eq!(by_size.len(), 5);
    assert!(
        by_size
            .iter()
            .filter_map(|op| op.target())
            .all(|target| target.starts_with(root.join("organized/by-size/tiny")))
    );

    let custom = plan_organize(
        &records,
        root,
        &Strategy::Custom("{type}/{tags}".to_owned()),
        today()?,
    )?;
    let ideas = custom
        .iter()
        .find(|op| op.label() == "Ideas.md")
        .and_then(|op| op.target().map(PathBuf::from));
    assert_eq!(ideas, Some(root.join("organized/custom/notes/ideas/Ideas.md")));

    let invalid = plan_organize(&records, root, &Strategy::Custom("{weekday}".to_owned()), today()?);
    assert!(matches!(invalid, Err(VaultError::InvalidPattern(_))));
    Ok(())
}

#[test]
fn test_rename_by_title_on_disk() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let records = Scanner::new(root)?.scan().records;

    let operations = plan_rename(&records, RenamePattern::Title, today()?);
    assert_eq!(operations.len(), 1, "Only Meeting Notes has a title");

    let report = Engine::local().apply(&operations, |_, _, _| {});
    assert!(report.is_clean());
    assert!(root.join("Weekly-Sync.md").is_file());
    assert!(!root.join("Meeting Notes.md").exists());
    Ok(())
}
