// Who are we? Needed for mention confirmation and the events listing.
use tracing::debug;

use crate::{source::GitHubSource, Error, Result};

/// Resolve the authenticated user's login
pub async fn current_login(source: &dyn GitHubSource) -> Result<String> {
    let login = source.current_login().await?;
    let login = login.trim();

    if login.is_empty() {
        return Err(Error::AuthError("viewer login came back empty".to_string()));
    }

    debug!("Resolved current user as {}", login);
    Ok(login.to_string())
}
