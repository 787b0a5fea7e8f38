// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the core.
///
/// Per-file variants (`Io`, `DestinationExists`, `SourceMissing`) are collected
/// into batch reports. `NoVaultSet` and `InvalidPattern` indicate caller misuse
/// and are returned straight to the caller.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("no vault selected; pass --directory or run inside a vault")]
    NoVaultSet,
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("source file no longer exists: {}", .0.display())]
    SourceMissing(PathBuf),
    #[error("refusing to rewrite unparseable frontmatter in {}", .0.display())]
    MalformedFrontmatter(PathBuf),
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
