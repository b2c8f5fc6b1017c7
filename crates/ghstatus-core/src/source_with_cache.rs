// GitHubSource with a response cache in front
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ghstatus_api::{Event, Notification, SearchResponse};
use ghstatus_cache::ResponseCache;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{source::GitHubSource, Result};

/// Source that checks the cache before hitting the API
///
/// Keys are prefixed with a namespace (normally the API base URL plus a
/// fingerprint of the token) so two hosts or two accounts never share
/// entries. Cache trouble is logged and otherwise ignored: a broken cache
/// costs a live request, never a failed run.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<ResponseCache>,
    ttl: Duration,
    namespace: String,
}

impl<S: GitHubSource> CachedSource<S> {
    pub fn new(inner: S, cache: Arc<ResponseCache>, ttl: Duration, namespace: &str) -> Self {
        Self {
            inner,
            cache,
            ttl,
            namespace: namespace.to_string(),
        }
    }

    /// Scope entries to whoever `token` belongs to. Only a hash prefix of
    /// the token ends up in the key.
    pub fn with_credential(mut self, token: Option<&str>) -> Self {
        self.namespace = format!("{}|{}", self.namespace, credential_fingerprint(token));
        self
    }

    fn key(&self, parts: &[&str]) -> String {
        format!("{}|{}", self.namespace, parts.join("|"))
    }

    async fn cached<T, Fut>(&self, key: String, fetch: Fut) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        match self.cache.get::<T>(&key, self.ttl) {
            Ok(Some(hit)) => {
                debug!("Cache hit for {}", key);
                return Ok(hit);
            }
            Ok(None) => debug!("Cache miss for {}", key),
            Err(e) => warn!("Cache read failed for {}: {}", key, e),
        }

        let value = fetch.await?;

        if let Err(e) = self.cache.set(&key, &value) {
            warn!("Failed to cache {}: {}", key, e);
        }

        Ok(value)
    }
}

fn credential_fingerprint(token: Option<&str>) -> String {
    match token {
        Some(token) => hex::encode(&Sha256::digest(token.as_bytes())[..8]),
        None => "anonymous".to_string(),
    }
}

#[async_trait::async_trait]
impl<S: GitHubSource> GitHubSource for CachedSource<S> {
    async fn current_login(&self) -> Result<String> {
        let key = self.key(&["viewer"]);
        self.cached(key, self.inner.current_login()).await
    }

    async fn notifications(&self, page: u32) -> Result<Vec<Notification>> {
        let page_str = page.to_string();
        let key = self.key(&["notifications", page_str.as_str()]);
        self.cached(key, self.inner.notifications(page)).await
    }

    async fn received_events(&self, login: &str, page: u32) -> Result<Vec<Event>> {
        let page_str = page.to_string();
        let key = self.key(&["received_events", login, page_str.as_str()]);
        self.cached(key, self.inner.received_events(login, page)).await
    }

    async fn comment_body(&self, url: &str) -> Result<String> {
        let key = self.key(&["comment", url]);
        self.cached(key, self.inner.comment_body(url)).await
    }

    async fn search_assignments(
        &self,
        assignments: &str,
        review_requested: &str,
    ) -> Result<SearchResponse> {
        let key = self.key(&["search", assignments, review_requested]);
        self.cached(key, self.inner.search_assignments(assignments, review_requested))
            .await
    }
}
