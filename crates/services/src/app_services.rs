use std::sync::Arc;

use storage::{LocalCache, Storage};

use crate::Clock;
use crate::bank_client::{BankApi, BankConfig, HttpBankClient};
use crate::error::AppServicesError;
use crate::flashcards::FlashcardService;
use crate::progress_service::ProgressService;
use crate::quiz::QuizService;
use crate::word_bank::WordBankStore;

/// Assembles app-facing services over one local store and one bank API.
#[derive(Clone)]
pub struct AppServices {
    cache: LocalCache,
    word_bank: Arc<WordBankStore>,
    progress: Arc<ProgressService>,
    quiz: Arc<QuizService>,
    flashcards: Arc<FlashcardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP bank client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: BankConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api: Arc<dyn BankApi> = Arc::new(HttpBankClient::new(config));
        Ok(Self::with_api(&storage, clock, api))
    }

    /// Build services over any storage backend and bank API.
    #[must_use]
    pub fn with_api(storage: &Storage, clock: Clock, api: Arc<dyn BankApi>) -> Self {
        let cache = LocalCache::new(Arc::clone(&storage.local));
        let word_bank = Arc::new(WordBankStore::new(api, cache.clone()));
        let progress = Arc::new(ProgressService::new(clock, cache.clone()));
        let quiz = Arc::new(QuizService::new(clock, Arc::clone(&word_bank)));
        let flashcards = Arc::new(FlashcardService::new(
            Arc::clone(&word_bank),
            Arc::clone(&progress),
        ));

        Self {
            cache,
            word_bank,
            progress,
            quiz,
            flashcards,
        }
    }

    #[must_use]
    pub fn word_bank(&self) -> Arc<WordBankStore> {
        Arc::clone(&self.word_bank)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn flashcards(&self) -> Arc<FlashcardService> {
        Arc::clone(&self.flashcards)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the token cannot be read.
    pub async fn signed_in(&self) -> Result<bool, AppServicesError> {
        Ok(self.cache.access_token().await?.is_some())
    }

    /// Store the bank API token, or sign out with `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the token cannot be written.
    pub async fn set_access_token(&self, token: Option<&str>) -> Result<(), AppServicesError> {
        self.cache.set_access_token(token).await?;
        Ok(())
    }
}
