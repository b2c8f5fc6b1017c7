use crate::models::StatusItem;

/// Per-run org / exclude criteria
///
/// Both are plain predicates. Logins and repo names compare ASCII
/// case-insensitively, same as GitHub treats them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    org: Option<String>,
    exclude: Vec<String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single owning organization. Blank means no restriction.
    pub fn org(mut self, org: impl Into<String>) -> Self {
        let org = org.into();
        let trimmed = org.trim();
        self.org = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Add a comma-separated `owner/repo` list to the denylist
    pub fn exclude(mut self, list: &str) -> Self {
        self.exclude.extend(
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string),
        );
        self
    }

    pub fn org_login(&self) -> Option<&str> {
        self.org.as_deref()
    }

    pub fn excluded(&self) -> &[String] {
        &self.exclude
    }

    /// Does `owner` satisfy the org filter? Always true without one.
    pub fn matches_org(&self, owner: &str) -> bool {
        match &self.org {
            Some(org) => org.eq_ignore_ascii_case(owner),
            None => true,
        }
    }

    pub fn is_excluded(&self, repository: &str) -> bool {
        self.exclude
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(repository))
    }

    /// Combined predicate applied to every bucket
    pub fn allows(&self, item: &StatusItem) -> bool {
        !self.is_excluded(&item.repository) && self.matches_org(item.owner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(repository: &str) -> StatusItem {
        StatusItem {
            repository: repository.to_string(),
            identifier: format!("{}#7", repository),
            preview: "x".to_string(),
            reason: String::new(),
        }
    }

    #[test]
    fn test_default_allows_everything() {
        let filters = Filters::new();
        assert!(filters.allows(&item("rpd/todo")));
        assert!(filters.matches_org("anyone"));
        assert_eq!(filters.org_login(), None);
    }

    #[test]
    fn test_blank_org_is_no_org() {
        let filters = Filters::new().org("   ");
        assert_eq!(filters.org_login(), None);
    }

    #[test]
    fn test_org_filter() {
        let filters = Filters::new().org("rpd");
        assert!(filters.allows(&item("rpd/todo")));
        assert!(filters.allows(&item("RPD/todo")));
        assert!(!filters.allows(&item("umbrella/bad")));
    }

    #[test]
    fn test_exclude_parsing_trims_and_skips_blanks() {
        let filters = Filters::new().exclude(" wesker/evil, ,umbrella/bad,");
        assert_eq!(filters.excluded(), ["wesker/evil", "umbrella/bad"]);

        assert!(!filters.allows(&item("wesker/evil")));
        assert!(!filters.allows(&item("umbrella/bad")));
        assert!(filters.allows(&item("umbrella/good")));
    }

    #[test]
    fn test_exclude_and_org_combine() {
        let filters = Filters::new().org("rpd").exclude("rpd/secret");
        assert!(filters.allows(&item("rpd/todo")));
        assert!(!filters.allows(&item("rpd/secret")));
        assert!(!filters.allows(&item("stars/todo")));
    }
}
