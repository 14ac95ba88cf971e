//! Token file for persisting login state between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use blogdesk_core::error::StorageError;
use blogdesk_core::{CredentialToken, Result, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Token store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The token file in the platform data directory, creating the
    /// directory if needed.
    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = ProjectDirs::from("", "", "blogdesk")
            .context("Could not determine data directory")?;

        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        Ok(Self::new(data_dir.join("token.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<CredentialToken>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::new("read token file", e.to_string()).into()),
        };

        let stored: StoredToken = serde_json::from_str(&json)
            .map_err(|e| StorageError::new("parse token file", e.to_string()))?;

        // A hand-edited file may hold a blank token; treat it as logged out.
        Ok(CredentialToken::new(stored.token).ok())
    }

    fn save(&self, token: &CredentialToken) -> Result<()> {
        let stored = StoredToken {
            token: token.as_str().to_string(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| StorageError::new("encode token file", e.to_string()))?;

        fs::write(&self.path, json)
            .map_err(|e| StorageError::new("write token file", e.to_string()))?;

        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .map_err(|e| StorageError::new("restrict token file", e.to_string()))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new("remove token file", e.to_string()).into()),
        }
    }
}
