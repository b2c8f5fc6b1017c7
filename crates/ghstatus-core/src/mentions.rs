// Mentions bucket: notifications filtered down to genuine @-mentions
use futures::stream::{self, StreamExt, TryStreamExt};
use ghstatus_api::{Notification, NotificationReason};
use tracing::{debug, info};

use crate::{
    filter::Filters,
    models::{single_line, LineBreaks, StatusItem},
    pagination::collect_pages,
    source::GitHubSource,
    Result,
};

/// How many notification pages to read per run
pub const NOTIFICATION_PAGES: u32 = 3;

/// Default number of comment fetches allowed in flight at once
pub const DEFAULT_MENTION_WORKERS: usize = 3;

/// Build the mentions bucket.
///
/// The notifications API can't filter on reason and over-reports mentions
/// (team mentions count too), so we pull a few pages, keep the `mention`
/// ones and then read each candidate's latest comment to check it really
/// contains `@login`. Those comment fetches go through a pool of `workers`
/// and the first failure aborts the whole bucket.
pub async fn load(
    source: &dyn GitHubSource,
    login: &str,
    filters: &Filters,
    workers: usize,
) -> Result<Vec<StatusItem>> {
    let notifications = collect_pages("notifications", NOTIFICATION_PAGES, |page| {
        source.notifications(page)
    })
    .await?;

    let candidates: Vec<Notification> = notifications
        .into_iter()
        .filter(|n| n.reason == NotificationReason::Mention)
        // org check first, so we don't fetch comments we'd throw away
        .filter(|n| filters.matches_org(&n.repository.owner.login))
        .collect();

    debug!("Confirming {} mention candidates", candidates.len());

    let handle = format!("@{}", login);
    let confirmed: Vec<Option<StatusItem>> = stream::iter(candidates)
        .map(|n| confirm(source, &handle, n))
        .buffered(workers.max(1))
        .try_collect()
        .await?;

    let mentions: Vec<StatusItem> = confirmed.into_iter().flatten().collect();
    info!("Found {} mentions", mentions.len());

    Ok(mentions)
}

async fn confirm(
    source: &dyn GitHubSource,
    handle: &str,
    notification: Notification,
) -> Result<Option<StatusItem>> {
    let repository = &notification.repository.full_name;

    let Some(number) = notification
        .subject
        .url
        .as_deref()
        .and_then(trailing_segment)
        .and_then(|segment| segment.parse::<u64>().ok())
        .filter(|number| *number > 0)
    else {
        debug!("No issue or PR number for a mention in {}", repository);
        return Ok(None);
    };

    let Some(url) = notification
        .subject
        .latest_comment_url
        .as_deref()
        .filter(|url| !url.is_empty())
    else {
        debug!("No comment to check for {}", repository);
        return Ok(None);
    };

    let body = source.comment_body(url).await?;

    if body.is_empty() || !body.contains(handle) {
        return Ok(None);
    }

    Ok(Some(StatusItem {
        repository: repository.clone(),
        identifier: format!("{}#{}", repository, number),
        preview: single_line(&body, LineBreaks::Strip),
        reason: String::new(),
    }))
}

/// Last path segment of a URL, e.g. `110` for `.../issues/110`
fn trailing_segment(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockGitHubSource;
    use crate::test_support::{comment_url, notification};
    use crate::Error;

    fn source_with(notifications: Vec<Notification>) -> MockGitHubSource {
        let mut source = MockGitHubSource::new();
        source.expect_notifications().returning(move |page| {
            Ok(if page == 1 {
                notifications.clone()
            } else {
                Vec::new()
            })
        });
        source
    }

    #[tokio::test]
    async fn test_only_confirmed_mentions_survive() {
        let mut source = source_with(vec![
            notification(NotificationReason::Mention, "rpd/todo", 110),
            notification(NotificationReason::Mention, "rpd/todo", 111),
            notification(NotificationReason::Subscribed, "rpd/todo", 112),
        ]);
        source.expect_comment_body().times(2).returning(|url| {
            if url.ends_with("/110") {
                Ok("hey @jillvalentine\r\ncan you look?\n".to_string())
            } else {
                Ok("cc @rpd/team".to_string())
            }
        });

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();

        assert_eq!(
            mentions,
            vec![StatusItem {
                repository: "rpd/todo".to_string(),
                identifier: "rpd/todo#110".to_string(),
                preview: "hey @jillvalentinecan you look?".to_string(),
                reason: String::new(),
            }]
        );
    }

    #[tokio::test]
    async fn test_non_mention_reasons_never_fetch_comments() {
        let mut source = source_with(vec![
            notification(NotificationReason::TeamMention, "rpd/todo", 1),
            notification(NotificationReason::Comment, "rpd/todo", 2),
            notification(NotificationReason::Other, "rpd/todo", 3),
        ]);
        source.expect_comment_body().never();

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();
        assert!(mentions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_is_not_a_mention() {
        let mut source = source_with(vec![notification(
            NotificationReason::Mention,
            "rpd/todo",
            110,
        )]);
        source
            .expect_comment_body()
            .times(1)
            .returning(|_| Ok(String::new()));

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();
        assert!(mentions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_comment_url_is_skipped_without_fetch() {
        let mut n = notification(NotificationReason::Mention, "rpd/todo", 5);
        n.subject.latest_comment_url = None;

        let mut source = source_with(vec![n]);
        source.expect_comment_body().never();

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();
        assert!(mentions.is_empty());
    }

    #[tokio::test]
    async fn test_mention_without_a_number_is_skipped_without_fetch() {
        let mut n = notification(NotificationReason::Mention, "rpd/todo", 5);
        n.subject.url = None;
        let mut odd = notification(NotificationReason::Mention, "rpd/todo", 6);
        odd.subject.url = Some("https://api.github.com/repos/rpd/todo/releases/latest".to_string());

        let mut source = source_with(vec![n, odd]);
        source.expect_comment_body().never();

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();
        assert!(mentions.is_empty());
    }

    #[tokio::test]
    async fn test_org_filter_skips_before_fetching() {
        let mut source = source_with(vec![
            notification(NotificationReason::Mention, "umbrella/bad", 1),
            notification(NotificationReason::Mention, "rpd/todo", 2),
        ]);
        let rpd_comment = comment_url("rpd/todo", 2);
        source
            .expect_comment_body()
            .withf(move |url| url == rpd_comment)
            .times(1)
            .returning(|_| Ok("@jillvalentine ping".to_string()));

        let filters = Filters::new().org("rpd");
        let mentions = load(&source, "jillvalentine", &filters, 3).await.unwrap();

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].identifier, "rpd/todo#2");
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_everything() {
        let mut source = source_with(vec![
            notification(NotificationReason::Mention, "rpd/todo", 1),
            notification(NotificationReason::Mention, "rpd/todo", 2),
        ]);
        source.expect_comment_body().returning(|url| {
            if url.ends_with("/2") {
                Err(Error::ApiError("connection reset".to_string()))
            } else {
                Ok("@jillvalentine".to_string())
            }
        });

        let result = load(&source, "jillvalentine", &Filters::new(), 2).await;
        assert!(matches!(result, Err(Error::ApiError(_))));
    }

    #[tokio::test]
    async fn test_source_order_is_kept_with_a_pool() {
        let notifications: Vec<Notification> = (1..=6)
            .map(|n| notification(NotificationReason::Mention, "rpd/todo", n))
            .collect();
        let mut source = source_with(notifications);
        source
            .expect_comment_body()
            .times(6)
            .returning(|_| Ok("@jillvalentine".to_string()));

        let mentions = load(&source, "jillvalentine", &Filters::new(), 2)
            .await
            .unwrap();

        let ids: Vec<&str> = mentions.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(
            ids,
            [
                "rpd/todo#1",
                "rpd/todo#2",
                "rpd/todo#3",
                "rpd/todo#4",
                "rpd/todo#5",
                "rpd/todo#6"
            ]
        );
        assert!(mentions.iter().all(|m| m.preview.contains("@jillvalentine")));
    }

    #[tokio::test]
    async fn test_reads_every_page_of_a_busy_inbox() {
        let mut source = MockGitHubSource::new();
        // notifications never come back more than 50 to a page
        source
            .expect_notifications()
            .times(NOTIFICATION_PAGES as usize)
            .returning(|page| {
                let first = u64::from(page) * 100;
                Ok((first + 1..=first + 50)
                    .map(|n| notification(NotificationReason::Mention, "rpd/todo", n))
                    .collect())
            });
        source
            .expect_comment_body()
            .returning(|_| Ok("@jillvalentine".to_string()));

        let mentions = load(&source, "jillvalentine", &Filters::new(), 3)
            .await
            .unwrap();

        assert_eq!(mentions.len(), 150);
        assert_eq!(mentions[0].identifier, "rpd/todo#101");
        assert_eq!(mentions[149].identifier, "rpd/todo#350");
    }

    #[test]
    fn test_trailing_segment() {
        assert_eq!(
            trailing_segment("https://api.github.com/repos/rpd/todo/pulls/42"),
            Some("42")
        );
        assert_eq!(trailing_segment("https://x/y/7/"), Some("7"));
        assert_eq!(trailing_segment(""), None);
    }
}
