// tests/integration_tests/report_test.rs
use super::common::{create_test_file, setup_test_vault};
use anyhow::Result;
use vaultorg::core::report::{Inconsistency, Issue, build_report, render};
use vaultorg::{Config, Scanner};

#[test]
fn test_vault_report() -> Result<()> {
    let temp_dir = setup_test_vault()?;
    let root = temp_dir.path();
    create_test_file(root, "long.md", &format!("# Long\n{}\n", "x".repeat(1200)))?;

    let outcome = Scanner::for_vault(root, &Config::default())?.scan();
    let report = build_report(&outcome);

    assert_eq!(report.total_files, 6);
    assert_eq!(report.processed_files, 6);
    assert!(report.errors.is_empty());

    let issues_for = |name: &str| {
        report
            .file_issues
            .iter()
            .find(|f| f.path.ends_with(name))
            .map(|f| f.issues.clone())
            .unwrap_or_default()
    };
    assert_eq!(issues_for("empty.md"), vec![Issue::EmptyFile, Issue::MissingTitle]);
    assert_eq!(
        issues_for("long.md"),
        vec![Issue::LongLine {
            line: 2,
            length: 1200
        }]
    );
    assert_eq!(issues_for("Ideas.md"), vec![Issue::MissingTitle]);
    assert_eq!(
        issues_for("Meeting Notes.md"),
        vec![Issue::InvalidValue(
            "Category: expected array, found string 'work, planning'".to_owned()
        )]
    );
    assert!(issues_for("2024-01-05.md").is_empty());

    assert!(report.inconsistencies.contains(&Inconsistency::SimilarNames {
        canonical: "tags".to_owned(),
        names: vec!["Category".to_owned(), "tags".to_owned()],
    }));

    let text = render(&report);
    assert!(text.contains("Inconsistencies"));
    assert!(text.contains("similar names for 'tags': Category, tags"));
    assert!(text.contains("line 2 is 1200 characters long"));
    Ok(())
}
