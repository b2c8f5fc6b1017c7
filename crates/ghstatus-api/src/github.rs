use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::events::Event;
use crate::notifications::Notification;
use crate::search::{SearchResponse, ViewerResponse, ASSIGNED_SEARCH_QUERY, VIEWER_QUERY};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// REST listings are requested at the maximum page size GitHub allows
pub const REST_PAGE_SIZE: u32 = 100;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Thin client over the REST and GraphQL endpoints `ghstatus` reads from.
///
/// The host is always explicit: pass the REST base and GraphQL endpoint for
/// GitHub Enterprise, or use [`GitHubClient::new`] for github.com.
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    api_url: String,
    graphql_url: String,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Deserialize)]
struct CommentBody {
    #[serde(default)]
    body: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_endpoints(
            token,
            GITHUB_API_BASE.to_string(),
            format!("{}/graphql", GITHUB_API_BASE),
        )
    }

    /// For GitHub Enterprise or testing against a local server
    pub fn with_endpoints(
        token: Option<String>,
        api_url: String,
        graphql_url: String,
    ) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("ghstatus/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
            graphql_url,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Resolve a REST path against the API base. Absolute URLs (like the
    /// `latest_comment_url` GitHub hands back) are used as-is.
    fn rest_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.api_url, path.trim_start_matches('/'))
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a REST resource and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.rest_url(path);
        debug!("GET {}", url);

        let request = self.authorize(self.client.get(&url).query(query));
        let response = request.send().await?;
        let body = Self::checked_body(response, &url).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// POST a GraphQL query. A 200 carrying an `errors` array is still an error.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        debug!("POST {}", self.graphql_url);

        let payload = serde_json::json!({ "query": query, "variables": variables });
        let request = self.authorize(self.client.post(&self.graphql_url).json(&payload));
        let response = request.send().await?;
        let body = Self::checked_body(response, &self.graphql_url).await?;

        let decoded: GraphQlResponse<T> = serde_json::from_str(&body)?;
        if !decoded.errors.is_empty() {
            let messages: Vec<String> = decoded.errors.into_iter().map(|e| e.message).collect();
            return Err(GitHubError::GraphQl(messages.join("; ")));
        }

        decoded
            .data
            .ok_or_else(|| GitHubError::GraphQl("response contained no data".to_string()))
    }

    async fn checked_body(response: reqwest::Response, url: &str) -> Result<String> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GitHubError::AuthRequired);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && Self::quota_exhausted(&response))
        {
            return Err(GitHubError::RateLimitExceeded);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }

    fn quota_exhausted(response: &reqwest::Response) -> bool {
        response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false)
    }

    /// Login of whoever owns the token
    pub async fn current_login(&self) -> Result<String> {
        let resp: ViewerResponse = self.graphql(VIEWER_QUERY, serde_json::json!({})).await?;
        Ok(resp.viewer.login)
    }

    /// One page of participating notifications, read ones included.
    /// Mentions can't be filtered server-side, so callers over-fetch.
    pub async fn notifications(&self, page: u32) -> Result<Vec<Notification>> {
        self.get_json(
            "notifications",
            &[
                ("per_page", REST_PAGE_SIZE.to_string()),
                ("participating", "true".to_string()),
                ("all", "true".to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    /// One page of events received by `login`
    pub async fn received_events(&self, login: &str, page: u32) -> Result<Vec<Event>> {
        let path = format!("users/{}/received_events", login);
        self.get_json(
            &path,
            &[
                ("per_page", REST_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    /// Body of the comment at `url`. A null body comes back empty.
    pub async fn comment_body(&self, url: &str) -> Result<String> {
        let comment: CommentBody = self.get_json(url, &[]).await?;
        Ok(comment.body.unwrap_or_default())
    }

    /// Run the combined assignment / review-request search
    pub async fn search_assignments(
        &self,
        assignments: &str,
        review_requested: &str,
    ) -> Result<SearchResponse> {
        self.graphql(
            ASSIGNED_SEARCH_QUERY,
            serde_json::json!({
                "assignments": assignments,
                "reviewRequested": review_requested,
            }),
        )
        .await
    }
}
