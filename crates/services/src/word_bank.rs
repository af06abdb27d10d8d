use std::sync::Arc;

use storage::LocalCache;
use tracing::{debug, info, warn};
use vocab_core::model::{DEFAULT_WORDS, EntryError, EntryId, VocabularyEntry, default_words};
use vocab_core::{PoolSources, VocabularyPool, build_pool, merge_pool};

use crate::bank_client::{Activity, AddStatus, BankApi, Identification, ImageUpload};
use crate::error::{BankApiError, WordBankError};

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Where a loaded word list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankSource {
    Remote,
    /// The server was unreachable or refused; this is the last cached list.
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBank {
    pub entries: Vec<VocabularyEntry>,
    pub source: BankSource,
    pub my_list_count: usize,
    pub default_count: usize,
}

/// Which copy of the word list an add reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub status: AddStatus,
    pub persisted: Persisted,
    /// Server id, when the server stored the word.
    pub id: Option<EntryId>,
    pub entry: VocabularyEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTarget {
    /// A word the server knows by id.
    Remote(EntryId),
    /// A word by its position in the local cache.
    Local(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub identification: Identification,
    pub outcome: AddOutcome,
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Saved words, kept on the server when possible and in the local cache
/// always.
///
/// The two copies are not reconciled beyond "a successful load overwrites the
/// cache". Words added while offline stay local until the server list that
/// replaces them happens to contain them.
#[derive(Clone)]
pub struct WordBankStore {
    api: Arc<dyn BankApi>,
    cache: LocalCache,
}

impl WordBankStore {
    #[must_use]
    pub fn new(api: Arc<dyn BankApi>, cache: LocalCache) -> Self {
        Self { api, cache }
    }

    /// Fetch the saved words, falling back to the cache.
    ///
    /// Never fails: any remote failure yields the cached list and any cache
    /// failure yields an empty one.
    pub async fn load(&self) -> LoadedBank {
        let token = self.token().await;
        match self.api.fetch_bank(token.as_deref()).await {
            Ok(snapshot) => {
                if let Err(err) = self.cache.save_bank(&snapshot.items).await {
                    warn!(error = %err, "could not refresh the local word cache");
                } else {
                    info!(count = snapshot.items.len(), "word cache refreshed from server");
                }
                LoadedBank {
                    entries: snapshot.items,
                    source: BankSource::Remote,
                    my_list_count: snapshot.my_list_count,
                    default_count: snapshot.default_count,
                }
            }
            Err(err) => {
                warn!(error = %err, "word bank unavailable, using local cache");
                let entries = self.cache.load_bank().await.unwrap_or_else(|err| {
                    warn!(error = %err, "local word cache unreadable");
                    Vec::new()
                });
                LoadedBank {
                    my_list_count: entries.len(),
                    default_count: DEFAULT_WORDS.len(),
                    entries,
                    source: BankSource::Cache,
                }
            }
        }
    }

    /// Deduplicate `scanned` and `defaults` into one pool; see
    /// [`merge_pool`].
    #[must_use]
    pub fn merge(defaults: &[VocabularyEntry], scanned: &[VocabularyEntry]) -> VocabularyPool {
        merge_pool(defaults, scanned)
    }

    /// Load the saved words and merge them with the built-in defaults.
    pub async fn pool(&self, sources: PoolSources) -> VocabularyPool {
        let saved = if sources.include_saved {
            self.load().await.entries
        } else {
            Vec::new()
        };
        build_pool(&default_words(), &saved, sources)
    }

    /// The cached list as stored, newest first. Positions index
    /// [`RemoveTarget::Local`].
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::Storage` if the cache cannot be read.
    pub async fn cached(&self) -> Result<Vec<VocabularyEntry>, WordBankError> {
        Ok(self.cache.load_bank().await?)
    }

    /// Save a word.
    ///
    /// A word already in the cache reports `Exists` and changes nothing.
    /// Otherwise the server is tried first; if it cannot take the word
    /// (offline, not signed in, error status) the word is kept locally and
    /// reported as `Added` with `Persisted::Local`. Only an `Added` outcome
    /// touches the cache; a server `Exists` leaves it for the next load.
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::Validation` for blank text, before any I/O.
    /// Returns `WordBankError::Storage` if the cache cannot be read or written.
    pub async fn add(&self, entry: VocabularyEntry) -> Result<AddOutcome, WordBankError> {
        let entry = VocabularyEntry::new(
            entry.source_text(),
            entry.target_text(),
            entry.transliteration().map(str::to_string),
        )?;
        let key = entry.identity_key();

        let mut cached = self.cache.load_bank().await?;
        if let Some(existing) = cached.iter().find(|e| e.identity_key() == key) {
            debug!(%key, "word already saved");
            return Ok(AddOutcome {
                status: AddStatus::Exists,
                persisted: Persisted::Local,
                id: existing.id(),
                entry: existing.clone(),
            });
        }

        let token = self.token().await;
        let outcome = match self.api.add_entry(&entry, token.as_deref()).await {
            Ok(reply) => {
                let stored = match reply.id {
                    Some(id) => entry.with_id(id),
                    None => entry,
                };
                AddOutcome {
                    status: reply.status,
                    persisted: Persisted::Remote,
                    id: reply.id,
                    entry: stored,
                }
            }
            Err(err) => {
                warn!(%key, error = %err, "server add failed, keeping word locally");
                AddOutcome {
                    status: AddStatus::Added,
                    persisted: Persisted::Local,
                    id: None,
                    entry,
                }
            }
        };

        if outcome.status == AddStatus::Added {
            cached.insert(0, outcome.entry.clone());
            self.cache.save_bank(&cached).await?;
        } else {
            debug!(%key, "server already has the word");
        }
        Ok(outcome)
    }

    /// Translate `source_text` on the server and save the pair.
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::TranslationUnavailable` when the server has no
    /// translation and `WordBankError::Translation` when the call fails; the
    /// word is not saved in either case. Otherwise as [`add`](Self::add).
    pub async fn add_translated(&self, source_text: &str) -> Result<AddOutcome, WordBankError> {
        let source_text = source_text.trim();
        if source_text.is_empty() {
            return Err(EntryError::EmptySource.into());
        }

        let translation = self
            .api
            .translate(source_text)
            .await
            .map_err(WordBankError::Translation)?;
        if translation.target_text.trim().is_empty() {
            return Err(WordBankError::TranslationUnavailable(source_text.to_string()));
        }

        let entry = VocabularyEntry::new(
            source_text,
            translation.target_text,
            translation.transliteration,
        )?;
        self.add(entry).await
    }

    /// Identify the object in `image` and save the recognized word.
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::IdentificationUnavailable` if either side of
    /// the recognized pair is blank and `WordBankError::Identification` when
    /// the call fails. Otherwise as [`add`](Self::add).
    pub async fn add_scanned(&self, image: &ImageUpload) -> Result<ScanOutcome, WordBankError> {
        let identification = self
            .api
            .identify(image)
            .await
            .map_err(WordBankError::Identification)?;
        if identification.source_text.trim().is_empty()
            || identification.target_text.trim().is_empty()
        {
            return Err(WordBankError::IdentificationUnavailable);
        }

        let entry = VocabularyEntry::new(
            identification.source_text.as_str(),
            identification.target_text.as_str(),
            identification.transliteration.clone(),
        )?;
        let outcome = self.add(entry).await?;
        self.report_activity(Activity::Scan).await;

        Ok(ScanOutcome {
            identification,
            outcome,
        })
    }

    /// Remove a word. Returns `false` when there was nothing to remove.
    ///
    /// A remote delete also drops cached copies carrying that id, including
    /// after a 404. Without a usable token (none stored, or a 401) nothing is
    /// removed and the cache is left as it is.
    ///
    /// # Errors
    ///
    /// Returns `WordBankError::Remote` for remote failures other than 401 and
    /// 404; the cache is left untouched then. Returns `WordBankError::Storage` if
    /// the cache cannot be read or written.
    pub async fn remove(&self, target: RemoveTarget) -> Result<bool, WordBankError> {
        match target {
            RemoveTarget::Remote(id) => {
                let token = self.token().await;
                let removed = match self.api.delete_entry(id, token.as_deref()).await {
                    Ok(()) => true,
                    Err(BankApiError::NotFound) => {
                        debug!(%id, "word already gone on server");
                        false
                    }
                    Err(BankApiError::Unauthorized) => {
                        warn!(%id, "not signed in, server word left in place");
                        return Ok(false);
                    }
                    Err(err) => return Err(err.into()),
                };

                let mut cached = self.cache.load_bank().await?;
                let before = cached.len();
                cached.retain(|e| e.id() != Some(id));
                if cached.len() != before {
                    self.cache.save_bank(&cached).await?;
                }
                Ok(removed)
            }
            RemoveTarget::Local(position) => {
                let mut cached = self.cache.load_bank().await?;
                if position >= cached.len() {
                    return Ok(false);
                }
                cached.remove(position);
                self.cache.save_bank(&cached).await?;
                Ok(true)
            }
        }
    }

    /// Bump a server-side streak counter. Failures are logged and dropped.
    pub async fn report_activity(&self, activity: Activity) {
        let token = self.token().await;
        if let Err(err) = self.api.report_activity(activity, token.as_deref()).await {
            debug!(?activity, error = %err, "activity not reported");
        }
    }

    async fn token(&self) -> Option<String> {
        self.cache.access_token().await.unwrap_or_else(|err| {
            warn!(error = %err, "could not read access token");
            None
        })
    }
}
