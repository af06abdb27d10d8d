use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::model::ids::EntryId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("source text cannot be empty")]
    EmptySource,

    #[error("target text cannot be empty")]
    EmptyTarget,
}

//
// ─── IDENTITY KEY ──────────────────────────────────────────────────────────────
//

/// Deduplication key of a vocabulary entry.
///
/// Built as `lowercase(trim(source)) + "|" + trim(target)`. The target side
/// keeps its case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    #[must_use]
    pub fn new(source_text: &str, target_text: &str) -> Self {
        Self(format!(
            "{}|{}",
            source_text.trim().to_lowercase(),
            target_text.trim()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// A word pair: the learner's known language (`source`) and the language
/// being learned (`target`).
///
/// The serialized shape matches the bank API (`english` / `tamil`). Values
/// read from the wire or the cache may be blank; such entries are
/// deserializable but not [`usable`](Self::is_usable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<EntryId>,
    #[serde(rename = "english", default, deserialize_with = "nullable_text")]
    source_text: String,
    #[serde(rename = "tamil", default, deserialize_with = "nullable_text")]
    target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transliteration: Option<String>,
}

impl VocabularyEntry {
    /// Builds a validated entry. Text is trimmed and a blank transliteration
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptySource` or `EntryError::EmptyTarget` when
    /// either side is blank.
    pub fn new(
        source_text: impl Into<String>,
        target_text: impl Into<String>,
        transliteration: Option<String>,
    ) -> Result<Self, EntryError> {
        let source_text = source_text.into().trim().to_string();
        let target_text = target_text.into().trim().to_string();
        if source_text.is_empty() {
            return Err(EntryError::EmptySource);
        }
        if target_text.is_empty() {
            return Err(EntryError::EmptyTarget);
        }

        let transliteration = transliteration
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            id: None,
            source_text,
            target_text,
            transliteration,
        })
    }

    pub(crate) fn builtin(source_text: &str, target_text: &str) -> Self {
        Self {
            id: None,
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
            transliteration: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<EntryId> {
        self.id
    }

    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    #[must_use]
    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    /// Phonetic hint, if a non-blank one is attached.
    #[must_use]
    pub fn transliteration(&self) -> Option<&str> {
        self.transliteration
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.source_text, &self.target_text)
    }

    /// True when both texts are present. Merge and quiz building skip
    /// anything else.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.source_text.trim().is_empty() && !self.target_text.trim().is_empty()
    }
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
