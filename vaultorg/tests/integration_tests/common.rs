// tests/integration_tests/common.rs
use anyhow::Result;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vaultorg::core::ignore::IGNORE_FILE_NAME;

pub const MEETING: &str = "---\ntitle: Weekly Sync\ndate-created: 2024-03-01\nCategory: work, planning\n---\n# Team Meeting\nDiscussed [[Roadmap]] and #followup items.\n";
pub const JOURNAL: &str = "# Friday\nDaily note: quiet day.   \n\n\n\nEnd\n";
pub const IDEAS: &str = "---\ntags: [ideas]\n---\nSome thoughts about #rust\n";

pub fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}

pub fn create_ignore_file(dir: &Path, patterns: &[&str]) -> Result<()> {
    create_test_file(dir, IGNORE_FILE_NAME, &patterns.join("\n"))?;
    Ok(())
}

/// Files whose name contains `marker`, anywhere below `dir`.
pub fn files_containing(dir: &Path, marker: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().contains(marker) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// A small Obsidian vault: five notes, one of them empty, plus files the
/// scanner must never pick up.
pub fn setup_test_vault() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    create_test_file(root, ".obsidian/app.json", "{}")?;
    create_test_file(root, "Meeting Notes.md", MEETING)?;
    create_test_file(root, "Journal/2024-01-05.md", JOURNAL)?;
    create_test_file(root, "Ideas.md", IDEAS)?;
    create_test_file(root, "empty.md", "")?;
    create_test_file(root, "templates/daily.md", "# {{date}}\n")?;

    create_test_file(root, "attachments/diagram.png", "not really a png")?;
    create_test_file(root, "node_modules/pkg/readme.md", "package docs")?;
    create_test_file(root, ".git/description.md", "git internals")?;

    Ok(temp_dir)
}
