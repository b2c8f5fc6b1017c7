use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry from `users/{login}/received_events`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Only present when the repo belongs to an organization
    #[serde(default)]
    pub org: Option<EventOrg>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: EventPayload,
}

/// Event kinds we know how to classify. Everything else lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    IssuesEvent,
    PullRequestEvent,
    IssueCommentEvent,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOrg {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepo {
    /// owner/repo
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub issue: Option<IssueOrPullRequest>,
    #[serde(default)]
    pub pull_request: Option<IssueOrPullRequest>,
    #[serde(default)]
    pub comment: Option<EventComment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueOrPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventComment {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}
