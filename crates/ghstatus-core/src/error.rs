use thiserror::Error;

/// All the ways a status run can go wrong
///
/// Nothing here is retried. Any of these ends the run, and the loader that
/// hit it is recorded via [`Error::Loader`] so the message says where.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("GitHub API rate limit exceeded")]
    RateLimitExceeded,

    /// The search returned a node that is neither an Issue nor a PullRequest
    #[error("unsupported search result kind: {0:?}")]
    UnsupportedKind(String),

    #[error("could not load {loader}: {source}")]
    Loader {
        loader: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("Cache operation failed: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Tag an error with the loader it came out of
    pub fn context(self, loader: &'static str) -> Self {
        Error::Loader {
            loader,
            source: Box::new(self),
        }
    }

    /// The innermost error, with loader tags peeled off
    pub fn root(&self) -> &Error {
        match self {
            Error::Loader { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<ghstatus_api::GitHubError> for Error {
    fn from(err: ghstatus_api::GitHubError) -> Self {
        use ghstatus_api::GitHubError;

        match err {
            GitHubError::AuthRequired => {
                Error::AuthError("GitHub rejected the token (401)".to_string())
            }
            GitHubError::RateLimitExceeded => Error::RateLimitExceeded,
            other => Error::ApiError(other.to_string()),
        }
    }
}

impl From<ghstatus_cache::CacheError> for Error {
    fn from(err: ghstatus_cache::CacheError) -> Self {
        Error::CacheError(err.to_string())
    }
}
