//! File-backed credential store.
//!
//! The key lives in a small TOML file next to the config. Edits go through
//! `toml_edit` so anything else the user put in the file survives.

use rota_core::credentials::{CredentialStore, CREDENTIAL_KEY};
use rota_core::RotaError;
use std::path::{Path, PathBuf};

/// Stores the API key under `gemini-api-key` in a TOML file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<toml_edit::DocumentMut, RotaError> {
        if !self.path.exists() {
            return Ok(toml_edit::DocumentMut::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        content.parse().map_err(|e| {
            RotaError::Credential(format!(
                "Failed to parse {}: {e}",
                self.path.display()
            ))
        })
    }

    fn write_document(&self, doc: &toml_edit::DocumentMut) -> Result<(), RotaError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, doc.to_string())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, RotaError> {
        let doc = self.read_document()?;
        Ok(doc
            .get(CREDENTIAL_KEY)
            .and_then(|item| item.as_str())
            .map(str::to_string)
            .filter(|key| !key.trim().is_empty()))
    }

    fn set(&self, key: &str) -> Result<(), RotaError> {
        let mut doc = self.read_document()?;
        doc[CREDENTIAL_KEY] = toml_edit::value(key);
        self.write_document(&doc)?;
        tracing::debug!("Credential saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), RotaError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut doc = self.read_document()?;
        if doc.remove(CREDENTIAL_KEY).is_some() {
            self.write_document(&doc)?;
            tracing::debug!("Credential removed from {}", self.path.display());
        }
        Ok(())
    }
}
