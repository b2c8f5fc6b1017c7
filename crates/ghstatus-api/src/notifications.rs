use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub notification thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    pub reason: NotificationReason,
    pub subject: NotificationSubject,
    pub repository: NotificationRepository,
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Minimal repository info in notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRepository {
    pub full_name: String,
    pub owner: NotificationOwner,
}

/// Repository owner in notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationOwner {
    pub login: String,
}

/// Subject of the notification (Issue, PR, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSubject {
    pub title: String,
    #[serde(rename = "type")]
    pub subject_type: String, // "Issue", "PullRequest", "Commit", "Release"
    pub url: Option<String>,
    pub latest_comment_url: Option<String>,
}

/// Notification reason types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationReason {
    Assign,           // Assigned to you
    Author,           // You're the author
    Comment,          // Commented on
    Invitation,       // Invited to contribute
    Manual,           // Manually subscribed
    Mention,          // Mentioned you
    ReviewRequested,  // Review requested
    SecurityAlert,    // Security vulnerability
    StateChange,      // Issue/PR state changed
    Subscribed,       // Watching the repo
    TeamMention,      // Team mentioned
    #[serde(other)]
    Other,
}
