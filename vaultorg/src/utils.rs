// src/utils.rs
use crate::models::{ApplyReport, VaultDescriptor};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Path shown relative to the vault root when it lies inside it.
#[must_use]
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[must_use]
pub fn format_vault(vault: &VaultDescriptor) -> String {
    format!(
        "Vault: {}\nPath: {}\nObsidian folder: {}\nMarkdown files: {}",
        vault.name,
        vault.path.display(),
        if vault.has_obsidian_folder { "yes" } else { "no" },
        vault.markdown_file_count
    )
}

/// `success/total` line followed by one line per failure and the number of
/// backups written.
#[must_use]
pub fn format_apply_report(report: &ApplyReport, root: &Path) -> String {
    let mut out = format!("Applied {}/{} operation(s)", report.success_count, report.total);
    if !report.failures.is_empty() {
        let _ = write!(out, "\nFailed ({}):", report.failures.len());
        for failure in &report.failures {
            let _ = write!(
                out,
                "\n  {}: {}",
                display_relative(&failure.operation.source, root),
                failure.error
            );
        }
    }
    if !report.backups.is_empty() {
        let _ = write!(out, "\nBackups written: {}", report.backups.len());
    }
    out
}

pub fn print_paths(paths: &[PathBuf], root: &Path) {
    for path in paths {
        println!("{}", display_relative(path, root));
    }
}

pub fn print_progress(current: usize, total: usize, label: &str) {
    eprintln!("  [{current}/{total}] {label}");
}
