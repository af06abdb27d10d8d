use crate::model::entry::VocabularyEntry;

/// Built-in starter words, offered to every learner regardless of login.
pub const DEFAULT_WORDS: [(&str, &str); 10] = [
    ("apple", "ஆப்பிள்"),
    ("book", "புத்தகம்"),
    ("pen", "பேனா"),
    ("table", "மேசை"),
    ("chair", "நாற்காலி"),
    ("door", "கதவு"),
    ("window", "ஜன்னல்"),
    ("water", "தண்ணீர்"),
    ("milk", "பால்"),
    ("rice", "அரிசி"),
];

#[must_use]
pub fn default_words() -> Vec<VocabularyEntry> {
    DEFAULT_WORDS
        .iter()
        .map(|(source, target)| VocabularyEntry::builtin(source, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_and_unique() {
        let words = default_words();
        assert_eq!(words.len(), DEFAULT_WORDS.len());
        assert!(words.iter().all(VocabularyEntry::is_usable));

        let mut keys: Vec<_> = words.iter().map(VocabularyEntry::identity_key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), words.len());
    }
}
