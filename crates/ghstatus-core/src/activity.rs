// Repository activity bucket: received events boiled down to new issues,
// new PRs and comments
use ghstatus_api::{Event, EventType};
use tracing::info;

use crate::{
    filter::Filters,
    models::{preview_from, LineBreaks, StatusItem},
    pagination::collect_pages,
    source::GitHubSource,
    Result,
};

/// How many received-events pages to read per run
pub const EVENT_PAGES: u32 = 2;

pub async fn load(
    source: &dyn GitHubSource,
    login: &str,
    filters: &Filters,
) -> Result<Vec<StatusItem>> {
    let events = collect_pages("events", EVENT_PAGES, |page| {
        source.received_events(login, page)
    })
    .await?;

    let activity: Vec<StatusItem> = events
        .iter()
        .filter(|e| event_in_org(e, filters))
        .filter_map(classify)
        .collect();

    info!(
        "Classified {} of {} events as activity",
        activity.len(),
        events.len()
    );

    Ok(activity)
}

/// Events carry their own `org` field, which is absent for user-owned repos
fn event_in_org(event: &Event, filters: &Filters) -> bool {
    match filters.org_login() {
        Some(_) => event
            .org
            .as_ref()
            .map(|org| filters.matches_org(&org.login))
            .unwrap_or(false),
        None => true,
    }
}

/// Turn an event into an activity item, or `None` if it isn't one we show.
/// Only creation counts for issues and PRs; any issue comment counts.
pub fn classify(event: &Event) -> Option<StatusItem> {
    let repository = &event.repo.name;
    let payload = &event.payload;

    match event.event_type {
        EventType::IssuesEvent if payload.action.as_deref() == Some("opened") => {
            let issue = payload.issue.as_ref()?;
            Some(activity_item(repository, issue.number, &[issue.title.as_str()], "new issue"))
        }
        EventType::PullRequestEvent if payload.action.as_deref() == Some("opened") => {
            let pr = payload.pull_request.as_ref()?;
            Some(activity_item(repository, pr.number, &[pr.title.as_str()], "new PR"))
        }
        EventType::IssueCommentEvent => {
            let issue = payload.issue.as_ref()?;
            let body = payload
                .comment
                .as_ref()
                .and_then(|c| c.body.as_deref())
                .unwrap_or_default();
            let reason = format!("comment on {}", issue.title);
            Some(activity_item(repository, issue.number, &[body, issue.title.as_str()], &reason))
        }
        _ => None,
    }
}

fn activity_item(repository: &str, number: u64, preview: &[&str], reason: &str) -> StatusItem {
    let identifier = format!("{}#{}", repository, number);

    StatusItem {
        repository: repository.to_string(),
        preview: preview_from(preview, LineBreaks::Space, &identifier),
        identifier,
        reason: reason.to_string(),
    }
}
