// src/core/scanner/record.rs
use crate::core::extract::extract;
use crate::core::fs::{FileSystem, LocalFs};
use crate::error::VaultError;
use crate::models::FileRecord;
use std::path::Path;

/// Builds a [`FileRecord`] from the local filesystem.
///
/// # Errors
///
/// Returns [`VaultError::Io`] if the file cannot be stat'd or read as UTF-8.
#[inline]
pub fn build_record(path: &Path) -> Result<FileRecord, VaultError> {
    build_record_with(&LocalFs, path)
}

/// Builds a [`FileRecord`] through any [`FileSystem`].
///
/// # Errors
///
/// Returns [`VaultError::Io`] if the file cannot be stat'd or read as UTF-8.
pub fn build_record_with<F: FileSystem>(fs: &F, path: &Path) -> Result<FileRecord, VaultError> {
    let stat = fs.stat(path).map_err(|e| VaultError::io(path, e))?;
    let raw = fs
        .read_to_string(path)
        .map_err(|e| VaultError::io(path, e))?;
    let metadata = extract(&raw);

    Ok(FileRecord {
        path: path.to_path_buf(),
        name: path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: stat.size,
        created: stat.created,
        modified: stat.modified,
        content: metadata.content,
        frontmatter: metadata.frontmatter,
        frontmatter_status: metadata.frontmatter_status,
        tags: metadata.tags,
        headings: metadata.headings,
        links: metadata.links,
        word_count: metadata.word_count,
    })
}
