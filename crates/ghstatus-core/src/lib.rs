// Core status logic - the loaders, the aggregator and everything they share
pub mod activity;
pub mod assignments;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod identity;
pub mod mentions;
pub mod models;
pub mod providers;
pub mod source;
pub mod source_with_cache;
pub mod status;

mod pagination;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter, StatusField};
pub use filter::Filters;
pub use models::{Bucket, StatusItem, StatusReport};
pub use providers::GitHubProvider;
pub use source::GitHubSource;
pub use source_with_cache::CachedSource;
pub use status::StatusAggregator;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
