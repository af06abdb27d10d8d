#![forbid(unsafe_code)]

pub mod cache;
pub mod repository;
pub mod sqlite;

pub use cache::LocalCache;
pub use repository::{InMemoryStore, LocalStore, Storage, StorageError};
