// Assigned issues, assigned PRs and review requests, all from one search
use std::str::FromStr;

use ghstatus_api::{SearchNode, SearchResponse};
use tracing::info;

use crate::{
    filter::Filters,
    models::{preview_from, LineBreaks, StatusItem},
    source::GitHubSource,
    Error, Result,
};

pub const ASSIGNED_QUERY: &str = "assignee:@me state:open";
pub const REVIEW_REQUESTED_QUERY: &str = "state:open review-requested:@me";

/// What a search node decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Issue,
    PullRequest,
}

impl FromStr for SearchKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Issue" => Ok(SearchKind::Issue),
            "PullRequest" => Ok(SearchKind::PullRequest),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }
}

/// The three search-backed buckets, each newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    pub issues: Vec<StatusItem>,
    pub pull_requests: Vec<StatusItem>,
    pub review_requests: Vec<StatusItem>,
}

/// Assignment search string, scoped to the org filter if there is one
pub fn assignment_query(filters: &Filters) -> String {
    match filters.org_login() {
        Some(org) => format!("{} org:{}", ASSIGNED_QUERY, org),
        None => ASSIGNED_QUERY.to_string(),
    }
}

pub async fn load(source: &dyn GitHubSource, filters: &Filters) -> Result<Assignments> {
    let response = source
        .search_assignments(&assignment_query(filters), REVIEW_REQUESTED_QUERY)
        .await?;

    let assignments = partition(response)?;

    info!(
        "Search found {} assigned issues, {} assigned PRs, {} review requests",
        assignments.issues.len(),
        assignments.pull_requests.len(),
        assignments.review_requests.len()
    );

    Ok(assignments)
}

/// Split the raw search response into buckets.
///
/// Assignment hits must be issues or PRs; review-request hits must be PRs.
/// Anything else means the query and the response disagree, which is an
/// error rather than something to skip.
pub fn partition(response: SearchResponse) -> Result<Assignments> {
    let mut issues = Vec::new();
    let mut pull_requests = Vec::new();

    for edge in response.assignments.edges {
        match edge.node.typename.parse::<SearchKind>()? {
            SearchKind::Issue => issues.push(edge.node),
            SearchKind::PullRequest => pull_requests.push(edge.node),
        }
    }

    let mut review_requests = Vec::new();
    for edge in response.review_requested.edges {
        match edge.node.typename.parse::<SearchKind>()? {
            SearchKind::PullRequest => review_requests.push(edge.node),
            SearchKind::Issue => return Err(Error::UnsupportedKind(edge.node.typename)),
        }
    }

    Ok(Assignments {
        issues: into_items(issues)?,
        pull_requests: into_items(pull_requests)?,
        review_requests: into_items(review_requests)?,
    })
}

/// Most recently updated first. `sort_by` is stable, so ties keep the
/// order the API returned them in.
fn by_recency(nodes: &mut [SearchNode]) {
    nodes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

fn into_items(mut nodes: Vec<SearchNode>) -> Result<Vec<StatusItem>> {
    by_recency(&mut nodes);
    nodes.into_iter().map(to_item).collect()
}

fn to_item(node: SearchNode) -> Result<StatusItem> {
    let repository = node
        .repository
        .map(|r| r.name_with_owner)
        .ok_or_else(|| {
            Error::ApiError(format!(
                "{} #{} came back without a repository",
                node.typename, node.number
            ))
        })?;

    if node.number == 0 {
        return Err(Error::ApiError(format!(
            "{} in {} came back without a number",
            node.typename, repository
        )));
    }

    let identifier = format!("{}#{}", repository, node.number);

    Ok(StatusItem {
        preview: preview_from(&[node.title.as_str()], LineBreaks::Space, &identifier),
        repository,
        identifier,
        reason: String::new(),
    })
}
