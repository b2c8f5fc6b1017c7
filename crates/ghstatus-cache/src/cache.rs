use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Response cache backed by SQLite
///
/// Stores API responses as JSON keyed by request identity. Entries carry the
/// time they were written; readers decide freshness by passing a TTL, so one
/// file can serve callers with different tolerances.
///
/// The connection sits behind a mutex so a single cache can be shared across
/// concurrently running loaders.
pub struct ResponseCache {
    conn: Mutex<Connection>,
}

impl ResponseCache {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Throwaway cache, handy for tests and `--no-cache`-style dry runs
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                cached_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Fetch a cached value if one exists and is younger than `ttl`
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Result<Option<T>> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;

        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT data, cached_at FROM responses WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((data, cached_at)) = row else {
            return Ok(None);
        };

        if is_expired(cached_at, ttl) {
            debug!("Cache entry for {} is stale", key);
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Store (or replace) the value for `key`
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value)?;
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;

        conn.execute(
            "INSERT INTO responses (key, data, cached_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET data = excluded.data, cached_at = excluded.cached_at",
            params![key, data, chrono::Utc::now().timestamp()],
        )?;

        Ok(())
    }

    /// Drop everything older than `ttl`. Returns how many rows went away.
    pub fn purge_expired(&self, ttl: Duration) -> Result<usize> {
        let cutoff = chrono::Utc::now().timestamp() - ttl_seconds(ttl);
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;

        let removed = conn.execute(
            "DELETE FROM responses WHERE cached_at <= ?1",
            params![cutoff],
        )?;

        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| CacheError::Poisoned)?;
        conn.execute("DELETE FROM responses", [])?;
        Ok(())
    }
}

fn ttl_seconds(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
}

fn is_expired(cached_at: i64, ttl: Duration) -> bool {
    let age = chrono::Utc::now().timestamp() - cached_at;
    age >= ttl_seconds(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache.db")).unwrap();

        cache.set("notifications:1", &vec!["a", "b"]).unwrap();
        let hit: Option<Vec<String>> = cache.get("notifications:1", MINUTE).unwrap();

        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = ResponseCache::in_memory().unwrap();
        let miss: Option<String> = cache.get("nope", MINUTE).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = ResponseCache::in_memory().unwrap();
        cache.set("login", &"jill").unwrap();

        let miss: Option<String> = cache.get("login", Duration::ZERO).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let cache = ResponseCache::in_memory().unwrap();
        cache.set("login", &"jill").unwrap();
        cache.set("login", &"chris").unwrap();

        let hit: Option<String> = cache.get("login", MINUTE).unwrap();
        assert_eq!(hit.as_deref(), Some("chris"));
    }

    #[test]
    fn test_purge_and_clear() {
        let cache = ResponseCache::in_memory().unwrap();
        cache.set("a", &1).unwrap();
        cache.set("b", &2).unwrap();

        // Nothing is a minute old yet
        assert_eq!(cache.purge_expired(MINUTE).unwrap(), 0);
        assert_eq!(cache.purge_expired(Duration::ZERO).unwrap(), 2);

        cache.set("c", &3).unwrap();
        cache.clear().unwrap();
        let miss: Option<i32> = cache.get("c", MINUTE).unwrap();
        assert!(miss.is_none());
    }
}
