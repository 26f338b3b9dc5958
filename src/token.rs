//! Persisted client state.
//!
//! A small JSON key/value file in the config directory. The only key the
//! front-end reads is the bearer token; other keys are preserved untouched.

use crate::error::TokenError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "LN_TOKEN";

/// Storage filename inside the config directory.
pub const STORAGE_FILENAME: &str = "storage.json";

/// File-backed client storage.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located in the given config directory.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join(STORAGE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored token. A missing file or key is not an error.
    pub fn token(&self) -> Result<Option<String>, TokenError> {
        Ok(self
            .read()?
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty()))
    }

    /// Stores a token, replacing any previous one.
    pub fn set_token(&self, token: &str) -> Result<(), TokenError> {
        let mut entries = self.read()?;
        entries.insert(TOKEN_KEY.to_string(), token.trim().to_string());
        self.write(&entries)
    }

    /// Removes the token. Returns whether one was stored.
    pub fn clear_token(&self) -> Result<bool, TokenError> {
        let mut entries = self.read()?;
        let removed = entries.remove(TOKEN_KEY).is_some();
        if removed {
            self.write(&entries)?;
        }
        Ok(removed)
    }

    fn read(&self) -> Result<BTreeMap<String, String>, TokenError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
