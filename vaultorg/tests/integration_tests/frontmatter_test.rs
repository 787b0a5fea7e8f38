// tests/integration_tests/frontmatter_test.rs
use super::common::{IDEAS, JOURNAL, MEETING};
use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use vaultorg::Engine;
use vaultorg::core::frontmatter::{parse_document, serialize};
use vaultorg::models::{Action, Frontmatter, FrontmatterEdit, FrontmatterStatus, Operation, Value};

#[test]
fn test_serialize_then_parse_is_stable() {
    let documents = [
        MEETING,
        JOURNAL,
        IDEAS,
        "---\ntitle: \"Colon: inside\"\nrating: 4.5\ndraft: false\nempty:\naliases: [one, \"two, three\"]\n---\nBody\n",
        "---\nquote: 'it''s'\nyes_string: \"yes\"\nnumeric_string: \"42\"\n---\n",
        "---\nbroken: [unclosed\nstill: parsed by lines\n---\ntext",
        "---\nstatus: 'False'\nflag: 'True'\nnone: 'NULL'\nhex: '0x10'\noctal: '0o17'\nbig: '.inf'\nodd: '.nan'\ntags: ['True', 'Null', x]\n---\n",
    ];

    for raw in documents {
        let first = parse_document(raw);
        let rewritten = serialize(&first.frontmatter, first.body);
        let second = parse_document(&rewritten);

        assert_eq!(
            second.frontmatter, first.frontmatter,
            "frontmatter changed after a round trip of {raw:?}"
        );
        assert_eq!(second.body, first.body, "body changed for {raw:?}");
    }
}

#[test]
fn test_loose_values_are_typed() {
    let doc = parse_document(
        "---\ntitle: \"Colon: inside\"\nrating: 4.5\ndraft: false\nempty:\naliases: [one, \"two, three\"]\n---\nBody\n",
    );

    assert_eq!(doc.status, FrontmatterStatus::Parsed);
    assert_eq!(
        doc.frontmatter.get("title"),
        Some(&Value::String("Colon: inside".to_owned()))
    );
    assert_eq!(doc.frontmatter.get("rating"), Some(&Value::Number(4.5)));
    assert_eq!(doc.frontmatter.get("draft"), Some(&Value::Bool(false)));
    assert_eq!(doc.frontmatter.get("empty"), Some(&Value::Null));
    assert_eq!(
        doc.frontmatter.get("aliases"),
        Some(&Value::List(vec!["one".to_owned(), "two, three".to_owned()]))
    );
}

#[test]
fn test_recovered_block_keeps_values() {
    let doc = parse_document("---\nbroken: [unclosed\nstill: parsed by lines\n---\ntext");

    assert_eq!(doc.status, FrontmatterStatus::Recovered);
    assert_eq!(
        doc.frontmatter.get("still"),
        Some(&Value::String("parsed by lines".to_owned()))
    );
    assert_eq!(doc.body, "text");
}

#[test]
fn test_update_keeps_types_of_other_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("note.md");
    fs::write(&path, "---\nstatus: 'False'\nlevel: 'NULL'\n---\nBody\n")?;

    let update: Frontmatter = [("x".to_owned(), Value::Number(1.0))].into_iter().collect();
    let operation = Operation::new(
        path.clone(),
        Action::UpdateFrontmatter {
            edit: FrontmatterEdit::Merge(update),
        },
    );
    let report = Engine::local().with_backup(false).apply(&[operation], |_, _, _| {});
    assert!(report.is_clean());

    let raw = fs::read_to_string(&path)?;
    let doc = parse_document(&raw);
    assert_eq!(doc.frontmatter.get("status"), Some(&Value::String("False".to_owned())));
    assert_eq!(doc.frontmatter.get("level"), Some(&Value::String("NULL".to_owned())));
    assert_eq!(doc.frontmatter.get("x"), Some(&Value::Number(1.0)));
    Ok(())
}
