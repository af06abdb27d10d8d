use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entry::IdentityKey;

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-word review tally kept on the device.
///
/// Stored as `{"correct", "incorrect", "lastReviewed"}` with the timestamp in
/// epoch milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "correct", default)]
    correct_count: u32,
    #[serde(rename = "incorrect", default)]
    incorrect_count: u32,
    #[serde(
        rename = "lastReviewed",
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    last_reviewed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }

    #[must_use]
    pub fn total_reviews(&self) -> u32 {
        self.correct_count.saturating_add(self.incorrect_count)
    }

    /// Count one review and stamp its time.
    pub fn record(&mut self, was_known: bool, reviewed_at: DateTime<Utc>) {
        if was_known {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
        self.last_reviewed_at = Some(reviewed_at);
    }
}

//
// ─── PROGRESS BOOK ─────────────────────────────────────────────────────────────
//

/// All progress records, keyed by identity key. Records are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressBook(BTreeMap<IdentityKey, ProgressRecord>);

impl ProgressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<&ProgressRecord> {
        self.0.get(key)
    }

    /// Apply a review, creating the record on first sight, and return the
    /// updated record.
    pub fn record_review(
        &mut self,
        key: IdentityKey,
        was_known: bool,
        reviewed_at: DateTime<Utc>,
    ) -> ProgressRecord {
        let record = self.0.entry(key).or_default();
        record.record(was_known, reviewed_at);
        *record
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn known_then_unknown_counts_both() {
        let mut book = ProgressBook::new();
        let key = IdentityKey::new("book", "புத்தகம்");

        book.record_review(key.clone(), true, fixed_now());
        let later = fixed_now() + Duration::seconds(30);
        let record = book.record_review(key.clone(), false, later);

        assert_eq!(record.correct_count(), 1);
        assert_eq!(record.incorrect_count(), 1);
        assert_eq!(record.last_reviewed_at(), Some(later));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn serializes_with_millisecond_timestamps() {
        let mut book = ProgressBook::new();
        book.record_review(IdentityKey::new("pen", "பேனா"), true, fixed_now());

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pen|பேனா": {"correct": 1, "incorrect": 0, "lastReviewed": 1_700_000_000_000_i64}
            })
        );

        let back: ProgressBook = serde_json::from_value(json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn tolerates_records_without_timestamp() {
        let book: ProgressBook =
            serde_json::from_str(r#"{"door|கதவு": {"correct": 2, "incorrect": 0}}"#).unwrap();
        let record = book.get(&IdentityKey::new("door", "கதவு")).unwrap();
        assert_eq!(record.correct_count(), 2);
        assert_eq!(record.last_reviewed_at(), None);
    }
}
