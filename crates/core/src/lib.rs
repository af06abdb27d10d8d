#![forbid(unsafe_code)]

pub mod model;
pub mod pool;
pub mod quiz;
pub mod time;

pub use pool::{PoolSources, VocabularyPool, build_pool, merge_pool};
pub use quiz::build_quiz;
pub use time::Clock;
