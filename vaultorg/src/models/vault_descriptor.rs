// src/models/vault_descriptor.rs
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDescriptor {
    pub name: String,
    pub path: PathBuf,
    pub is_vault: bool,
    pub has_obsidian_folder: bool,
    pub markdown_file_count: usize,
}

impl VaultDescriptor {
    #[must_use]
    pub fn new(path: PathBuf, has_obsidian_folder: bool, markdown_file_count: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            path,
            is_vault: has_obsidian_folder || markdown_file_count > 0,
            has_obsidian_folder,
            markdown_file_count,
        }
    }

    #[must_use]
    pub fn not_a_vault(path: PathBuf) -> Self {
        Self::new(path, false, 0)
    }
}
