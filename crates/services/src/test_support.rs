//! In-process stand-in for the bank API used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use storage::{InMemoryStore, LocalCache, LocalStore};
use vocab_core::model::{DEFAULT_WORDS, EntryId, VocabularyEntry};

use crate::bank_client::{
    Activity, AddResponse, AddStatus, BankApi, BankSnapshot, Identification, ImageUpload,
    Translation,
};
use crate::error::BankApiError;

#[derive(Default)]
struct FakeState {
    words: Vec<VocabularyEntry>,
    next_id: u64,
    failure: Option<StatusCode>,
    translation: Option<Translation>,
    identification: Option<Identification>,
    activities: Vec<Activity>,
    requests: usize,
}

/// Keeps a server-side word list in memory and follows the same token rules
/// as the HTTP client. `fail_with` makes every request answer with a status.
#[derive(Clone, Default)]
pub(crate) struct FakeBank {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBank {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_with(&self, status: StatusCode) {
        self.state.lock().unwrap().failure = Some(status);
    }

    pub(crate) fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub(crate) fn seed(&self, entry: VocabularyEntry) -> EntryId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = EntryId::new(state.next_id);
        state.words.insert(0, entry.with_id(id));
        id
    }

    pub(crate) fn set_translation(&self, target: &str, transliteration: Option<&str>) {
        self.state.lock().unwrap().translation = Some(Translation {
            target_text: target.to_string(),
            transliteration: transliteration.map(str::to_string),
        });
    }

    pub(crate) fn set_identification(&self, source: &str, target: &str, confidence: f64) {
        self.state.lock().unwrap().identification = Some(Identification {
            source_text: source.to_string(),
            target_text: target.to_string(),
            transliteration: None,
            part_of_speech: Some("noun".into()),
            confidence: Some(confidence),
        });
    }

    pub(crate) fn words(&self) -> Vec<VocabularyEntry> {
        self.state.lock().unwrap().words.clone()
    }

    pub(crate) fn activities(&self) -> Vec<Activity> {
        self.state.lock().unwrap().activities.clone()
    }

    pub(crate) fn requests(&self) -> usize {
        self.state.lock().unwrap().requests
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, FakeState>, BankApiError> {
        let mut state = self.state.lock().unwrap();
        state.requests += 1;
        let failure = state.failure;
        match failure {
            Some(status) if status == StatusCode::UNAUTHORIZED => Err(BankApiError::Unauthorized),
            Some(status) => Err(BankApiError::HttpStatus(status)),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl BankApi for FakeBank {
    async fn fetch_bank(&self, _token: Option<&str>) -> Result<BankSnapshot, BankApiError> {
        let state = self.begin()?;
        Ok(BankSnapshot {
            items: state.words.clone(),
            my_list_count: state.words.len(),
            default_count: DEFAULT_WORDS.len(),
        })
    }

    async fn add_entry(
        &self,
        entry: &VocabularyEntry,
        token: Option<&str>,
    ) -> Result<AddResponse, BankApiError> {
        token.ok_or(BankApiError::Unauthorized)?;
        let mut state = self.begin()?;
        let key = entry.identity_key();
        if let Some(existing) = state.words.iter().find(|w| w.identity_key() == key) {
            return Ok(AddResponse {
                status: AddStatus::Exists,
                id: existing.id(),
            });
        }
        state.next_id += 1;
        let id = EntryId::new(state.next_id);
        state.words.insert(0, entry.clone().with_id(id));
        Ok(AddResponse {
            status: AddStatus::Added,
            id: Some(id),
        })
    }

    async fn delete_entry(&self, id: EntryId, token: Option<&str>) -> Result<(), BankApiError> {
        token.ok_or(BankApiError::Unauthorized)?;
        let mut state = self.begin()?;
        let before = state.words.len();
        state.words.retain(|w| w.id() != Some(id));
        if state.words.len() == before {
            return Err(BankApiError::NotFound);
        }
        Ok(())
    }

    async fn translate(&self, _text: &str) -> Result<Translation, BankApiError> {
        let state = self.begin()?;
        Ok(state.translation.clone().unwrap_or(Translation {
            target_text: String::new(),
            transliteration: None,
        }))
    }

    async fn identify(&self, _image: &ImageUpload) -> Result<Identification, BankApiError> {
        let state = self.begin()?;
        state
            .identification
            .clone()
            .ok_or(BankApiError::HttpStatus(StatusCode::BAD_GATEWAY))
    }

    async fn report_activity(
        &self,
        activity: Activity,
        token: Option<&str>,
    ) -> Result<(), BankApiError> {
        token.ok_or(BankApiError::Unauthorized)?;
        let mut state = self.begin()?;
        state.activities.push(activity);
        Ok(())
    }
}

/// Cache over a fresh in-memory store, optionally signed in.
pub(crate) async fn cache_with_token(token: Option<&str>) -> LocalCache {
    let store: Arc<dyn LocalStore> = Arc::new(InMemoryStore::new());
    let cache = LocalCache::new(store);
    cache.set_access_token(token).await.unwrap();
    cache
}

pub(crate) fn word(source: &str, target: &str) -> VocabularyEntry {
    VocabularyEntry::new(source, target, None).unwrap()
}
