use ghstatus_api::{Event, Notification, SearchResponse};

use crate::Result;

/// Everything the status loaders need from GitHub
///
/// The real thing is [`crate::providers::GitHubProvider`]; tests swap in a
/// mock, and [`crate::CachedSource`] wraps either.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GitHubSource: Send + Sync {
    /// Login of the authenticated user
    async fn current_login(&self) -> Result<String>;

    /// One page (1-based) of participating notifications
    async fn notifications(&self, page: u32) -> Result<Vec<Notification>>;

    /// One page (1-based) of events received by `login`
    async fn received_events(&self, login: &str, page: u32) -> Result<Vec<Event>>;

    /// Body text of the comment at `url`
    async fn comment_body(&self, url: &str) -> Result<String>;

    /// Combined assignment / review-request search
    async fn search_assignments(
        &self,
        assignments: &str,
        review_requested: &str,
    ) -> Result<SearchResponse>;
}
