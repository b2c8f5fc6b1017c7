// Concrete GitHubSource implementations
pub mod github;

pub use github::GitHubProvider;
