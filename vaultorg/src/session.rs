// src/session.rs
use crate::config::Config;
use crate::error::VaultError;
use crate::models::VaultDescriptor;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Most recently used vaults remembered per session.
pub const RECENT_LIMIT: usize = 10;

/// State shared by every command run in one invocation.
///
/// There is a single writer: only [`Session::set_current_vault`] changes the
/// current vault.
#[derive(Debug, Default)]
pub struct Session {
    pub config: Config,
    current: Option<VaultDescriptor>,
    recent: Vec<PathBuf>,
}

impl Session {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn current_vault(&self) -> Option<&VaultDescriptor> {
        self.current.as_ref()
    }

    /// Most recent first.
    #[must_use]
    pub fn recent_vaults(&self) -> &[PathBuf] {
        &self.recent
    }

    /// Makes `vault` the current vault. Returns `false` and changes nothing
    /// when the descriptor is not a vault.
    pub fn set_current_vault(&mut self, vault: VaultDescriptor) -> bool {
        if !vault.is_vault {
            debug!("{} is not a vault", vault.path.display());
            return false;
        }
        info!("current vault: {} ({})", vault.name, vault.path.display());
        self.recent.retain(|path| *path != vault.path);
        self.recent.insert(0, vault.path.clone());
        self.recent.truncate(RECENT_LIMIT);
        self.current = Some(vault);
        true
    }

    /// Vault root for a command: the explicit path if given, otherwise the
    /// current vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NoVaultSet`] when neither is available.
    pub fn resolve_vault(&self, explicit: Option<&Path>) -> Result<PathBuf, VaultError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.current.as_ref().map(|vault| vault.path.clone()))
            .ok_or(VaultError::NoVaultSet)
    }
}
