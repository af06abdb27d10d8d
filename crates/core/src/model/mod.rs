mod defaults;
mod entry;
mod ids;
mod progress;
mod question;
mod stats;

pub use defaults::{DEFAULT_WORDS, default_words};
pub use entry::{EntryError, IdentityKey, VocabularyEntry};
pub use ids::{EntryId, ParseIdError};
pub use progress::{ProgressBook, ProgressRecord};
pub use question::QuizQuestion;
pub use stats::SessionStats;
