// src/core/scanner/utils.rs
use crate::core::ignore::Patterns;
use crate::core::scanner::{EXCLUDED_DIRS, ORGANIZED_DIR_PREFIX};
use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Resolves `dir` against the current directory when it is relative.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute_path(dir: &Path) -> io::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(dir))
    }
}

/// Determines if a directory entry should be skipped, along with its subtree:
/// - built-in excluded directories (`.git`, `.obsidian`, `node_modules`)
/// - top-level `organized*` directories written by earlier runs
/// - configured extra directory names
/// - rules from the vault's ignore file
///
/// The walk root itself is never excluded.
pub fn should_exclude(
    entry: &walkdir::DirEntry,
    root: &Path,
    exclude_dirs: &[String],
    ignore: &Patterns,
) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let is_dir = entry.file_type().is_dir();
    if is_dir {
        let name = entry.file_name().to_string_lossy();
        if EXCLUDED_DIRS.iter().any(|d| *d == name) || exclude_dirs.iter().any(|d| *d == name) {
            return true;
        }
        if entry.depth() == 1 && name.starts_with(ORGANIZED_DIR_PREFIX) {
            return true;
        }
    }

    entry
        .path()
        .strip_prefix(root)
        .is_ok_and(|relative| ignore.matches(relative, is_dir))
}
