//! Typed view over a [`LocalStore`]: the word cache, the progress map and the
//! access token, each serialized as JSON under a fixed key.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use vocab_core::model::{ProgressBook, VocabularyEntry};

use crate::repository::{LocalStore, StorageError};

pub const BANK_KEY: &str = "vocab_bank_v1";
pub const PROGRESS_KEY: &str = "vocab_progress_v1";
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Most entries kept in the local word cache. Extra entries are dropped from
/// the end of the list, which holds the oldest words.
pub const MAX_CACHED_ENTRIES: usize = 600;

#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn LocalStore>,
}

impl LocalCache {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Cached word list, newest first. A missing or unreadable value yields
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load_bank(&self) -> Result<Vec<VocabularyEntry>, StorageError> {
        Ok(self.read_json(BANK_KEY).await?.unwrap_or_default())
    }

    /// Replace the cached word list, keeping at most [`MAX_CACHED_ENTRIES`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_bank(&self, entries: &[VocabularyEntry]) -> Result<(), StorageError> {
        let kept = &entries[..entries.len().min(MAX_CACHED_ENTRIES)];
        self.write_json(BANK_KEY, kept).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn load_progress(&self) -> Result<ProgressBook, StorageError> {
        Ok(self.read_json(PROGRESS_KEY).await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save_progress(&self, book: &ProgressBook) -> Result<(), StorageError> {
        self.write_json(PROGRESS_KEY, book).await
    }

    /// Bearer token for the bank API; blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        let token = self.store.get(ACCESS_TOKEN_KEY).await?;
        Ok(token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Store or clear (`None`) the access token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn set_access_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => self.store.set(ACCESS_TOKEN_KEY, token).await,
            None => self.store.remove(ACCESS_TOKEN_KEY).await,
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable local value");
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &raw).await
    }
}
