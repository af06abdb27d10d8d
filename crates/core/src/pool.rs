use std::collections::HashSet;

use crate::model::VocabularyEntry;

/// Working set of entries for a quiz or flashcard session.
pub type VocabularyPool = Vec<VocabularyEntry>;

/// Upper bound on a merged pool; entries past it are dropped from the tail.
pub const MAX_POOL_SIZE: usize = 800;

/// Which sources feed a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSources {
    pub include_defaults: bool,
    pub include_saved: bool,
}

impl Default for PoolSources {
    fn default() -> Self {
        Self {
            include_defaults: true,
            include_saved: true,
        }
    }
}

/// Merge saved/scanned entries with the defaults.
///
/// `scanned` is walked before `defaults`, so a saved entry wins over a default
/// with the same identity key and keeps its own fields (a saved copy often
/// carries a transliteration the default lacks). Unusable entries are skipped.
/// Output keeps first-seen order.
#[must_use]
pub fn merge_pool(defaults: &[VocabularyEntry], scanned: &[VocabularyEntry]) -> VocabularyPool {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for entry in scanned.iter().chain(defaults) {
        if !entry.is_usable() {
            continue;
        }
        if seen.insert(entry.identity_key()) {
            out.push(entry.clone());
        }
        if out.len() == MAX_POOL_SIZE {
            break;
        }
    }

    out
}

/// Merge the enabled sources only.
#[must_use]
pub fn build_pool(
    defaults: &[VocabularyEntry],
    saved: &[VocabularyEntry],
    sources: PoolSources,
) -> VocabularyPool {
    let none: &[VocabularyEntry] = &[];
    let defaults = if sources.include_defaults { defaults } else { none };
    let saved = if sources.include_saved { saved } else { none };
    merge_pool(defaults, saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, IdentityKey, default_words};

    fn entry(source: &str, target: &str) -> VocabularyEntry {
        VocabularyEntry::new(source, target, None).unwrap()
    }

    fn entry_with_hint(source: &str, target: &str, hint: &str) -> VocabularyEntry {
        VocabularyEntry::new(source, target, Some(hint.to_string())).unwrap()
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_pool(&[], &[]).is_empty());
    }

    #[test]
    fn scanned_entries_shadow_defaults() {
        let defaults = vec![entry("apple", "ஆப்பிள்"), entry("book", "புத்தகம்")];
        let scanned = vec![
            entry_with_hint("Book ", "புத்தகம்", "puththagam").with_id(EntryId::new(9)),
            entry_with_hint("apple", "ஆப்பிள்", "aappil"),
        ];

        let merged = merge_pool(&defaults, &scanned);

        assert_eq!(merged.len(), defaults.len());
        assert_eq!(merged, scanned);
        assert_eq!(merged[0].transliteration(), Some("puththagam"));
        assert_eq!(merged[0].id(), Some(EntryId::new(9)));
    }

    #[test]
    fn merge_never_repeats_an_identity_key() {
        let scanned = vec![
            entry("Water", "தண்ணீர்"),
            entry("water", "தண்ணீர்"),
            entry("water ", "நீர்"),
        ];
        let merged = merge_pool(&default_words(), &scanned);

        let keys: HashSet<IdentityKey> = merged.iter().map(VocabularyEntry::identity_key).collect();
        assert_eq!(keys.len(), merged.len());
        // "water|நீர்" is a distinct pair and survives; the default water is shadowed.
        assert_eq!(merged.len(), default_words().len() + 1);
        assert_eq!(merged[0].source_text(), "Water");
        assert_eq!(merged[1].target_text(), "நீர்");
    }

    #[test]
    fn merge_drops_incomplete_entries() {
        let broken: VocabularyEntry = serde_json::from_str(r#"{"english": "ghost"}"#).unwrap();
        let merged = merge_pool(&[entry("pen", "பேனா")], &[broken]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_text(), "pen");
    }

    #[test]
    fn merge_caps_pool_size() {
        let scanned: Vec<_> = (0..MAX_POOL_SIZE + 50)
            .map(|i| entry(&format!("word{i}"), &format!("சொல்{i}")))
            .collect();
        let merged = merge_pool(&default_words(), &scanned);
        assert_eq!(merged.len(), MAX_POOL_SIZE);
        assert_eq!(merged[0].source_text(), "word0");
    }

    #[test]
    fn build_pool_respects_source_toggles() {
        let saved = vec![entry("cat", "பூனை")];
        let defaults = default_words();

        let only_saved = build_pool(
            &defaults,
            &saved,
            PoolSources {
                include_defaults: false,
                include_saved: true,
            },
        );
        assert_eq!(only_saved, saved);

        let only_defaults = build_pool(
            &defaults,
            &saved,
            PoolSources {
                include_defaults: true,
                include_saved: false,
            },
        );
        assert_eq!(only_defaults, defaults);

        let both = build_pool(&defaults, &saved, PoolSources::default());
        assert_eq!(both.len(), defaults.len() + 1);
    }
}
