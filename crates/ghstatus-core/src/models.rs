use serde::{Deserialize, Serialize};

/// One row of status output, whatever it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusItem {
    /// owner/repo
    pub repository: String,
    /// e.g. cli/cli#1234
    pub identifier: String,
    /// Single-line text safe to drop into a table cell
    pub preview: String,
    /// Only set for repository activity, the other buckets speak for themselves
    #[serde(default)]
    pub reason: String,
}

impl StatusItem {
    /// Owner half of `owner/repo`
    pub fn owner(&self) -> &str {
        owner_of(&self.repository)
    }
}

pub fn owner_of(repository: &str) -> &str {
    repository.split('/').next().unwrap_or_default()
}

/// How line breaks are flattened when building a preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreaks {
    /// Each newline becomes a space
    Space,
    /// Newlines are dropped outright
    Strip,
}

/// Flatten `text` to a single line: `\r` goes away, `\n` per `breaks`.
pub fn single_line(text: &str, breaks: LineBreaks) -> String {
    let joiner = match breaks {
        LineBreaks::Space => " ",
        LineBreaks::Strip => "",
    };

    text.replace('\r', "").replace('\n', joiner).trim().to_string()
}

/// First candidate that is non-empty once flattened, else `fallback`.
/// Keeps previews from ever being blank.
pub fn preview_from(candidates: &[&str], breaks: LineBreaks, fallback: &str) -> String {
    candidates
        .iter()
        .map(|c| single_line(c, breaks))
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| single_line(fallback, breaks))
}

/// The five output sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Mentions,
    AssignedIssues,
    AssignedPrs,
    ReviewRequests,
    RepoActivity,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Mentions,
        Bucket::AssignedIssues,
        Bucket::AssignedPrs,
        Bucket::ReviewRequests,
        Bucket::RepoActivity,
    ];

    /// Key used in exported output
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Mentions => "mentions",
            Bucket::AssignedIssues => "assignedIssues",
            Bucket::AssignedPrs => "assignedPRs",
            Bucket::ReviewRequests => "reviewRequests",
            Bucket::RepoActivity => "repoActivity",
        }
    }

    /// Human-facing section title
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Mentions => "Mentions",
            Bucket::AssignedIssues => "Assigned Issues",
            Bucket::AssignedPrs => "Assigned PRs",
            Bucket::ReviewRequests => "Review Requests",
            Bucket::RepoActivity => "Repository Activity",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Everything a status run produces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Who the report is for. Not part of the exported buckets.
    #[serde(skip)]
    pub login: String,
    pub mentions: Vec<StatusItem>,
    pub assigned_issues: Vec<StatusItem>,
    #[serde(rename = "assignedPRs")]
    pub assigned_prs: Vec<StatusItem>,
    pub review_requests: Vec<StatusItem>,
    pub repo_activity: Vec<StatusItem>,
}

impl StatusReport {
    pub fn bucket(&self, bucket: Bucket) -> &[StatusItem] {
        match bucket {
            Bucket::Mentions => &self.mentions,
            Bucket::AssignedIssues => &self.assigned_issues,
            Bucket::AssignedPrs => &self.assigned_prs,
            Bucket::ReviewRequests => &self.review_requests,
            Bucket::RepoActivity => &self.repo_activity,
        }
    }

    /// Buckets in display order, paired with their names
    pub fn buckets(&self) -> impl Iterator<Item = (Bucket, &[StatusItem])> + '_ {
        Bucket::ALL.into_iter().map(move |b| (b, self.bucket(b)))
    }

    /// Keep only items `keep` approves of, in every bucket
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&StatusItem) -> bool,
    {
        for bucket in [
            &mut self.mentions,
            &mut self.assigned_issues,
            &mut self.assigned_prs,
            &mut self.review_requests,
            &mut self.repo_activity,
        ] {
            bucket.retain(|item| keep(item));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets().all(|(_, items)| items.is_empty())
    }

    pub fn total(&self) -> usize {
        self.buckets().map(|(_, items)| items.len()).sum()
    }
}
