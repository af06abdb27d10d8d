#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_client;
pub mod error;
pub mod flashcards;
pub mod progress_service;
pub mod quiz;
pub mod word_bank;

#[cfg(test)]
mod test_support;

pub use vocab_core::Clock;

pub use app_services::AppServices;
pub use bank_client::{
    Activity, AddResponse, AddStatus, BankApi, BankConfig, BankSnapshot, DEFAULT_API_BASE,
    HttpBankClient, Identification, ImageUpload, Translation,
};
pub use error::{
    AppServicesError, BankApiError, BankConfigError, FlashcardError, ProgressError, QuizError,
    WordBankError,
};
pub use flashcards::{CardFront, FlashcardService, FlashcardSession};
pub use progress_service::ProgressService;
pub use quiz::{DEFAULT_QUESTION_COUNT, LockedAnswer, QuizPhase, QuizProgress, QuizService, QuizSession};
pub use word_bank::{
    AddOutcome, BankSource, LoadedBank, Persisted, RemoveTarget, ScanOutcome, WordBankStore,
};
