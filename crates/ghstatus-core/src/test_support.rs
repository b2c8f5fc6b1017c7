// Payload builders shared by the loader tests
use chrono::{DateTime, Utc};
use ghstatus_api::events::{EventComment, EventOrg, EventPayload, EventRepo, IssueOrPullRequest};
use ghstatus_api::notifications::{NotificationOwner, NotificationRepository, NotificationSubject};
use ghstatus_api::search::{SearchConnection, SearchEdge, SearchRepository};
use ghstatus_api::{Event, EventType, Notification, NotificationReason, SearchNode};

pub fn notification(reason: NotificationReason, repository: &str, number: u64) -> Notification {
    let owner = repository.split('/').next().unwrap_or_default();

    Notification {
        id: format!("{}-{}", repository, number),
        reason,
        subject: NotificationSubject {
            title: format!("subject {}", number),
            subject_type: "Issue".to_string(),
            url: Some(format!(
                "https://api.github.com/repos/{}/issues/{}",
                repository, number
            )),
            latest_comment_url: Some(comment_url(repository, number)),
        },
        repository: NotificationRepository {
            full_name: repository.to_string(),
            owner: NotificationOwner {
                login: owner.to_string(),
            },
        },
        unread: true,
        updated_at: None,
    }
}

pub fn comment_url(repository: &str, number: u64) -> String {
    format!(
        "https://api.github.com/repos/{}/issues/comments/{}",
        repository, number
    )
}

pub fn event(event_type: EventType, repository: &str) -> Event {
    let owner = repository.split('/').next().unwrap_or_default();

    Event {
        event_type,
        org: Some(EventOrg {
            login: owner.to_string(),
        }),
        created_at: None,
        repo: EventRepo {
            name: repository.to_string(),
        },
        payload: EventPayload::default(),
    }
}

pub fn issues_event(action: &str, repository: &str, number: u64, title: &str) -> Event {
    let mut e = event(EventType::IssuesEvent, repository);
    e.payload.action = Some(action.to_string());
    e.payload.issue = Some(issue(number, title));
    e
}

pub fn pull_request_event(action: &str, repository: &str, number: u64, title: &str) -> Event {
    let mut e = event(EventType::PullRequestEvent, repository);
    e.payload.action = Some(action.to_string());
    e.payload.pull_request = Some(issue(number, title));
    e
}

pub fn comment_event(repository: &str, number: u64, title: &str, body: &str) -> Event {
    let mut e = event(EventType::IssueCommentEvent, repository);
    e.payload.action = Some("created".to_string());
    e.payload.issue = Some(issue(number, title));
    e.payload.comment = Some(EventComment {
        body: Some(body.to_string()),
        html_url: Some(format!("https://github.com/{}/issues/{}", repository, number)),
    });
    e
}

fn issue(number: u64, title: &str) -> IssueOrPullRequest {
    IssueOrPullRequest {
        number,
        title: title.to_string(),
    }
}

pub fn search_node(
    typename: &str,
    repository: &str,
    number: u64,
    title: &str,
    updated_at: &str,
) -> SearchNode {
    SearchNode {
        typename: typename.to_string(),
        updated_at: Some(timestamp(updated_at)),
        title: title.to_string(),
        number,
        repository: Some(SearchRepository {
            name_with_owner: repository.to_string(),
        }),
    }
}

pub fn connection(nodes: Vec<SearchNode>) -> SearchConnection {
    SearchConnection {
        edges: nodes.into_iter().map(|node| SearchEdge { node }).collect(),
    }
}

pub fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}
