// tests/integration_tests/mutation_test.rs
use super::common::{create_test_file, files_containing, setup_test_vault};
use anyhow::Result;
use std::fs;
use vaultorg::core::batch::{add_tag, cleanup, delete_empty, find_replace};
use vaultorg::models::{Action, Operation};
use vaultorg::{Config, Engine, Scanner, VaultError, build_record};

#[test]
fn test_existing_destinations_fail_individually() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let names = ["Ideas.md", "Meeting Notes.md", "empty.md", "Journal/2024-01-05.md"];
    let occupied = create_test_file(root, "archive/Ideas.md", "already here")?;
    create_test_file(root, "archive/empty.md", "also here")?;

    let operations: Vec<Operation> = names
        .iter()
        .map(|name| {
            let source = root.join(name);
            let file_name = source.file_name().map(ToOwned::to_owned).unwrap_or_default();
            Operation::new(
                source,
                Action::Move {
                    to: root.join("archive").join(file_name),
                },
            )
        })
        .collect();

    let mut progress = Vec::new();
    let report = Engine::local().apply(&operations, |current, total, label| {
        progress.push(format!("{current}/{total} {label}"));
    });

    assert_eq!(report.total, 4);
    assert_eq!(report.success_count, 2, "N - K operations succeed");
    assert_eq!(report.failures.len(), 2, "K operations fail");
    assert!(
        report
            .failures
            .iter()
            .all(|f| matches!(f.error, VaultError::DestinationExists(_)))
    );
    assert_eq!(
        progress,
        vec!["1/4 Ideas.md", "2/4 Meeting Notes.md", "3/4 empty.md", "4/4 2024-01-05.md"]
    );
    assert_eq!(fs::read_to_string(occupied)?, "already here", "Nothing is overwritten");
    assert!(root.join("Ideas.md").exists(), "Failed moves leave the source alone");
    assert!(root.join("archive/2024-01-05.md").exists());
    Ok(())
}

#[test]
fn test_cleanup_and_delete_empty() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let config = Config::default();
    let records = Scanner::for_vault(root, &config)?.scan().records;

    let tidy = cleanup(&records);
    let touched: Vec<String> = tidy.iter().map(Operation::label).collect();
    assert_eq!(touched, vec!["2024-01-05.md"]);

    let report = Engine::local().apply(&tidy, |_, _, _| {});
    assert!(report.is_clean());
    assert_eq!(report.backups.len(), 1);
    assert_eq!(
        fs::read_to_string(root.join("Journal/2024-01-05.md"))?,
        "# Friday\nDaily note: quiet day.\n\nEnd\n"
    );
    assert_eq!(files_containing(root, ".backup.")?.len(), 1);

    let deletions = delete_empty(&records);
    assert_eq!(deletions.len(), 1);
    let report = Engine::local().apply(&deletions, |_, _, _| {});
    assert!(report.is_clean());
    assert!(!root.join("empty.md").exists());
    assert_eq!(
        files_containing(root, "empty.md.deleted.")?.len(),
        1,
        "Deletes are soft by default"
    );

    let rescanned = Scanner::for_vault(root, &config)?.scan();
    assert_eq!(rescanned.records.len(), 4, "Backups and deleted files are not notes");
    Ok(())
}

#[test]
fn test_replace_and_tag_keep_other_content() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    let meeting = root.join("Meeting Notes.md");
    let records = vec![build_record(&meeting)?];

    let operations = find_replace(&records, "roadmap", "Plan", false, false)?;
    let report = Engine::local().with_backup(false).apply(&operations, |_, _, _| {});
    assert!(report.is_clean());

    let records = vec![build_record(&meeting)?];
    let operations = add_tag(&records, "meeting")?;
    let report = Engine::local().with_backup(false).apply(&operations, |_, _, _| {});
    assert!(report.is_clean());

    let record = build_record(&meeting)?;
    assert!(record.content.contains("Discussed [[Plan]]"));
    assert_eq!(record.title(), Some("Weekly Sync"), "Other properties survive the merge");
    assert_eq!(
        record.frontmatter.keys().collect::<Vec<_>>(),
        vec!["title", "date-created", "Category", "tags"]
    );
    assert_eq!(record.tags, vec!["meeting", "followup"]);
    assert!(files_containing(root, ".backup.")?.is_empty());
    Ok(())
}
