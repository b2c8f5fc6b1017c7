// GitHub API client and the raw payload shapes it hands back
pub mod events;
pub mod github;
pub mod notifications;
pub mod search;

// Re-export common types
pub use events::{Event, EventType};
pub use github::{GitHubClient, GitHubError, GITHUB_API_BASE};
pub use notifications::{Notification, NotificationReason};
pub use search::{SearchNode, SearchResponse};
