use storage::LocalCache;
use tracing::debug;
use vocab_core::Clock;
use vocab_core::model::{ProgressBook, ProgressRecord, VocabularyEntry};

use crate::error::ProgressError;

/// Records flashcard reviews into the device-local progress map.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    cache: LocalCache,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, cache: LocalCache) -> Self {
        Self { clock, cache }
    }

    /// Count one review of `entry`, stamp it with the service clock and
    /// persist the whole map before returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the map cannot be read or written.
    pub async fn record_review(
        &self,
        entry: &VocabularyEntry,
        was_known: bool,
    ) -> Result<ProgressRecord, ProgressError> {
        let key = entry.identity_key();
        let mut book = self.cache.load_progress().await?;
        let record = book.record_review(key.clone(), was_known, self.clock.now());
        self.cache.save_progress(&book).await?;
        debug!(%key, was_known, total = record.total_reviews(), "review recorded");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the map cannot be read.
    pub async fn progress_for(
        &self,
        entry: &VocabularyEntry,
    ) -> Result<Option<ProgressRecord>, ProgressError> {
        let book = self.cache.load_progress().await?;
        Ok(book.get(&entry.identity_key()).copied())
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the map cannot be read.
    pub async fn book(&self) -> Result<ProgressBook, ProgressError> {
        Ok(self.cache.load_progress().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cache_with_token, word};
    use chrono::Duration;
    use vocab_core::time::fixed_now;

    #[tokio::test]
    async fn known_then_unknown_counts_one_each() {
        let cache = cache_with_token(None).await;
        let service = ProgressService::new(Clock::fixed(fixed_now()), cache.clone());
        let book = word("book", "புத்தகம்");

        service.record_review(&book, true).await.unwrap();
        let record = service.record_review(&book, false).await.unwrap();

        assert_eq!(record.correct_count(), 1);
        assert_eq!(record.incorrect_count(), 1);
        assert_eq!(record.last_reviewed_at(), Some(fixed_now()));

        let stored = cache.load_progress().await.unwrap();
        assert_eq!(stored.get(&book.identity_key()), Some(&record));
    }

    #[tokio::test]
    async fn reviews_are_keyed_by_identity() {
        let cache = cache_with_token(None).await;
        let mut clock = Clock::fixed(fixed_now());
        clock.advance(Duration::minutes(5));
        let service = ProgressService::new(clock, cache);

        service
            .record_review(&word("Water", "தண்ணீர்"), true)
            .await
            .unwrap();
        let record = service
            .progress_for(&word("water ", "தண்ணீர்"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.correct_count(), 1);
        assert_eq!(
            record.last_reviewed_at(),
            Some(fixed_now() + Duration::minutes(5))
        );
        assert_eq!(service.book().await.unwrap().len(), 1);
        assert_eq!(
            service.progress_for(&word("milk", "பால்")).await.unwrap(),
            None
        );
    }
}
