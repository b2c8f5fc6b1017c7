use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    activity, assignments, identity, mentions,
    filter::Filters,
    models::StatusReport,
    source::GitHubSource,
    Result,
};

/// Pulls the three loaders together into one report
///
/// The loaders only share the login and the filters, so they run side by
/// side. The first one to fail fails the whole run and the others are
/// dropped; there is no partial report.
pub struct StatusAggregator {
    source: Arc<dyn GitHubSource>,
    filters: Filters,
    mention_workers: usize,
}

impl StatusAggregator {
    pub fn new(source: Arc<dyn GitHubSource>, filters: Filters) -> Self {
        Self {
            source,
            filters,
            mention_workers: mentions::DEFAULT_MENTION_WORKERS,
        }
    }

    /// Cap on concurrent comment fetches while confirming mentions
    pub fn with_mention_workers(mut self, workers: usize) -> Self {
        self.mention_workers = workers.max(1);
        self
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub async fn load(&self) -> Result<StatusReport> {
        let source = self.source.as_ref();
        let filters = &self.filters;

        let login = identity::current_login(source)
            .await
            .map_err(|e| e.context("current user"))?;

        let (mentions, repo_activity, assignments) = tokio::try_join!(
            async {
                mentions::load(source, &login, filters, self.mention_workers)
                    .await
                    .map_err(|e| e.context("mentions"))
            },
            async {
                activity::load(source, &login, filters)
                    .await
                    .map_err(|e| e.context("repository activity"))
            },
            async {
                assignments::load(source, filters)
                    .await
                    .map_err(|e| e.context("assignments"))
            },
        )?;

        let mut report = StatusReport {
            login,
            mentions,
            assigned_issues: assignments.issues,
            assigned_prs: assignments.pull_requests,
            review_requests: assignments.review_requests,
            repo_activity,
        };

        let before = report.total();
        report.retain(|item| filters.allows(item));
        debug!("Filters dropped {} items", before - report.total());

        info!("Status ready with {} items", report.total());
        Ok(report)
    }
}
