//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::model::EntryError;

/// Errors emitted while reading bank client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankConfigError {
    #[error("invalid bank API base url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("bank API base url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// Errors emitted by the bank API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankApiError {
    #[error("bank API rejected the request: not signed in")]
    Unauthorized,
    #[error("bank API has no such word")]
    NotFound,
    #[error("bank API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `WordBankStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordBankError {
    #[error(transparent)]
    Validation(#[from] EntryError),
    #[error("no translation available for {0:?}")]
    TranslationUnavailable(String),
    #[error("translation failed: {0}")]
    Translation(#[source] BankApiError),
    #[error("the picture could not be identified")]
    IdentificationUnavailable,
    #[error("identification failed: {0}")]
    Identification(#[source] BankApiError),
    #[error(transparent)]
    Remote(#[from] BankApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    Empty,
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("{0:?} is not one of the offered options")]
    UnknownOption(String),
    #[error("current question has not been answered")]
    Unanswered,
}

/// Errors emitted by flashcard sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("no words available for flashcards")]
    Empty,
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
