use crate::core::extract::extract;
use crate::models::FileRecord;
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone as _};
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.path().join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(&file_path)?;
    file.write_all(content.as_bytes())?;
    Ok(file_path)
}

/// Three notes plus noise in every directory the scanner must skip.
pub fn setup_test_vault() -> Result<TempDir> {
    let dir = TempDir::new()?;

    create_test_file(
        &dir,
        "Simple File.md",
        "---\ntitle: Simple\n---\n# Simple File\nA note tagged #simple",
    )?;
    create_test_file(&dir, "Another File.md", "Just text")?;
    create_test_file(&dir, "nested/deep.markdown", "# Deep\nNested note")?;

    create_test_file(&dir, "readme.txt", "not markdown")?;
    create_test_file(&dir, ".obsidian/app.md", "config")?;
    create_test_file(&dir, ".git/HEAD.md", "git")?;
    create_test_file(&dir, "node_modules/pkg/README.md", "package")?;
    create_test_file(&dir, "organized/by-size/tiny/old.md", "organized earlier")?;

    Ok(dir)
}

/// Local midnight on the given day.
pub fn local_date(year: i32, month: u32, day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .earliest()
        .expect("valid local date")
}

/// A record built in memory, without touching the filesystem.
pub fn record(path: &str, raw: &str) -> FileRecord {
    let path = Path::new(path);
    let metadata = extract(raw);
    FileRecord {
        path: path.to_path_buf(),
        name: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: u64::try_from(raw.len()).unwrap_or(u64::MAX),
        created: None,
        modified: None,
        content: metadata.content,
        frontmatter: metadata.frontmatter,
        frontmatter_status: metadata.frontmatter_status,
        tags: metadata.tags,
        headings: metadata.headings,
        links: metadata.links,
        word_count: metadata.word_count,
    }
}
