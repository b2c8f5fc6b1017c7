// SQLite-based response cache
// Keeps repeat runs from hammering the API

pub mod cache;

pub use cache::{CacheError, ResponseCache};
