// Fixed-budget page walking for the REST listings
use std::future::Future;

use tracing::debug;

use crate::Result;

/// Fetch pages 1..=`max_pages`, concatenated in order.
///
/// The page budget is a hard cap, so very busy accounts get truncated
/// results. Short pages say nothing (notifications come back at most 50 to a
/// page whatever `per_page` asks for); only an empty page ends the walk early.
pub(crate) async fn collect_pages<T, F, Fut>(
    what: &str,
    max_pages: u32,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();

    for page in 1..=max_pages {
        let batch = fetch(page).await?;
        debug!("Fetched {} {} from page {}", batch.len(), what, page);

        if batch.is_empty() {
            break;
        }
        all.extend(batch);
    }

    Ok(all)
}
