// GitHub provider implementation - bridges API client with GitHubSource trait
use async_trait::async_trait;
use ghstatus_api::{Event, GitHubClient, Notification, SearchResponse};

use crate::{source::GitHubSource, Result};

/// Wrapper around GitHubClient that implements GitHubSource
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn api_url(&self) -> &str {
        self.client.api_url()
    }
}

#[async_trait]
impl GitHubSource for GitHubProvider {
    async fn current_login(&self) -> Result<String> {
        Ok(self.client.current_login().await?)
    }

    async fn notifications(&self, page: u32) -> Result<Vec<Notification>> {
        Ok(self.client.notifications(page).await?)
    }

    async fn received_events(&self, login: &str, page: u32) -> Result<Vec<Event>> {
        Ok(self.client.received_events(login, page).await?)
    }

    async fn comment_body(&self, url: &str) -> Result<String> {
        Ok(self.client.comment_body(url).await?)
    }

    async fn search_assignments(
        &self,
        assignments: &str,
        review_requested: &str,
    ) -> Result<SearchResponse> {
        Ok(self
            .client
            .search_assignments(assignments, review_requested)
            .await?)
    }
}
