//! Branch and title classification of merged pull requests.

use regex::Regex;
use tracing::debug;

use crate::error::{ReleaseError, Result};
use crate::types::{GitHubIssue, IssueType, PullRequestRecord};

pub const DEFAULT_PROJECT_KEY: &str = "SIG";

/// Derives issue type, display title and tracking key from a pull request.
pub struct IssueClassifier {
    title_key: Regex,
    title_key_token: Regex,
    branch_key: Regex,
    chore_prefix: Regex,
}

impl IssueClassifier {
    /// Build a classifier recognising keys of the given tracking project, e.g. `SIG-123`.
    pub fn new(project_key: &str) -> Result<Self> {
        if project_key.is_empty() || !project_key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReleaseError::InvalidProjectKey(project_key.to_string()));
        }

        let key = regex::escape(project_key);
        let build = |pattern: String| {
            Regex::new(&pattern).map_err(|_| ReleaseError::InvalidProjectKey(project_key.to_string()))
        };

        Ok(Self {
            title_key: build(format!(r"(?i){key}-\d+"))?,
            title_key_token: build(format!(r"(?i)\[?{key}-\d+\]? ?"))?,
            branch_key: build(format!(r"(?i){key}-?\d+"))?,
            chore_prefix: build(r"(?i)^\(?chore\)?:? ?".to_string())?,
        })
    }

    pub fn classify(&self, pull_request: PullRequestRecord) -> GitHubIssue {
        let title = pull_request.title.as_str();
        let head = pull_request.head_ref_name.as_str();

        let mut issue_type = None;
        let mut cleaned_title = None;
        let mut tracking_key = None;

        if head.starts_with("feature/") {
            issue_type = Some(IssueType::CoreTask);
        }

        if head.starts_with("chore") {
            issue_type = Some(IssueType::Chore);
            cleaned_title = Some(self.chore_prefix.replace(title, "").into_owned());
        } else if let Some(found) = self.title_key.find(title) {
            tracking_key = Some(found.as_str().to_uppercase());
            cleaned_title = Some(self.title_key_token.replace(title, "").into_owned());
        } else if let Some(found) = self.branch_key.find(head) {
            tracking_key = Some(found.as_str().to_uppercase());
        } else if title.starts_with("chore") {
            issue_type = Some(IssueType::Chore);
        }

        let display_title = display_title(cleaned_title.as_deref().unwrap_or(title));

        GitHubIssue {
            issue_type: issue_type.unwrap_or(IssueType::Unknown),
            display_title,
            tracking_key,
            pull_request,
        }
    }

    /// Classify the pull requests of a release in ascending number order,
    /// skipping the release itself, adjacent duplicates and `sync/` branches.
    pub fn collect(
        &self,
        release_number: u64,
        mut pull_requests: Vec<PullRequestRecord>,
    ) -> Vec<GitHubIssue> {
        pull_requests.sort_by_key(|pr| pr.number);

        let mut issues: Vec<GitHubIssue> = Vec::with_capacity(pull_requests.len());
        for pull_request in pull_requests {
            if pull_request.number == release_number {
                continue;
            }
            if issues.last().map(|last| last.pull_request.number) == Some(pull_request.number) {
                continue;
            }
            if pull_request.head_ref_name.starts_with("sync/") {
                debug!(number = pull_request.number, "Skipping sync pull request");
                continue;
            }
            issues.push(self.classify(pull_request));
        }

        issues
    }
}

/// Capitalize, trim and drop one trailing period.
fn display_title(title: &str) -> String {
    let mut chars = title.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    let trimmed = capitalized.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::fixtures::pull_request;

    fn classifier() -> IssueClassifier {
        IssueClassifier::new(DEFAULT_PROJECT_KEY).unwrap()
    }

    #[test]
    fn test_chore_branch() {
        let issue = classifier().classify(pull_request(1, "Update deps", "chore/update-deps"));
        assert_eq!(issue.issue_type, IssueType::Chore);
        assert_eq!(issue.display_title, "Update deps");
        assert_eq!(issue.tracking_key, None);
    }

    #[test]
    fn test_chore_branch_strips_prefix() {
        let c = classifier();
        let issue = c.classify(pull_request(1, "(chore) bump eslint", "chore/eslint"));
        assert_eq!(issue.display_title, "Bump eslint");

        let issue = c.classify(pull_request(2, "Chore: bump jest.", "chore-jest"));
        assert_eq!(issue.display_title, "Bump jest");
    }

    #[test]
    fn test_tracking_key_in_title() {
        let issue = classifier().classify(pull_request(2, "[SIG-123] Fix typo", "fix/sig-123-typo"));
        assert_eq!(issue.tracking_key.as_deref(), Some("SIG-123"));
        assert_eq!(issue.display_title, "Fix typo");
        assert_eq!(issue.issue_type, IssueType::Unknown);
    }

    #[test]
    fn test_tracking_key_unbracketed_lowercase() {
        let issue = classifier().classify(pull_request(2, "sig-42 add map layer.", "some-branch"));
        assert_eq!(issue.tracking_key.as_deref(), Some("SIG-42"));
        assert_eq!(issue.display_title, "Add map layer");
    }

    #[test]
    fn test_tracking_key_in_branch() {
        let issue = classifier().classify(pull_request(3, "fix the map", "fix/SIG1234-map"));
        assert_eq!(issue.tracking_key.as_deref(), Some("SIG1234"));
        assert_eq!(issue.display_title, "Fix the map");
    }

    #[test]
    fn test_feature_branch_keeps_key_lookup() {
        let issue = classifier().classify(pull_request(4, "SIG-7 Dashboard", "feature/dashboard"));
        assert_eq!(issue.issue_type, IssueType::CoreTask);
        assert_eq!(issue.tracking_key.as_deref(), Some("SIG-7"));
        assert_eq!(issue.display_title, "Dashboard");
    }

    #[test]
    fn test_chore_title() {
        let issue = classifier().classify(pull_request(5, "chore bump node", "misc"));
        assert_eq!(issue.issue_type, IssueType::Chore);
        assert_eq!(issue.display_title, "Chore bump node");
    }

    #[test]
    fn test_unknown() {
        let issue = classifier().classify(pull_request(6, "misc fixes", "misc"));
        assert_eq!(issue.issue_type, IssueType::Unknown);
        assert_eq!(issue.tracking_key, None);
    }

    #[test]
    fn test_custom_project_key() {
        let c = IssueClassifier::new("OPS").unwrap();
        let issue = c.classify(pull_request(7, "[OPS-9] Rotate keys", "ops-9"));
        assert_eq!(issue.tracking_key.as_deref(), Some("OPS-9"));
        let issue = c.classify(pull_request(8, "[SIG-9] Rotate keys", "misc"));
        assert_eq!(issue.tracking_key, None);
    }

    #[test]
    fn test_invalid_project_key() {
        assert!(IssueClassifier::new("").is_err());
        assert!(IssueClassifier::new("SIG-").is_err());
    }

    #[test]
    fn test_collect_sorts_and_skips() {
        let prs = vec![
            pull_request(6, "Six", "fix/six"),
            pull_request(5, "Five", "fix/five"),
            pull_request(10, "Release/v1.0.0", "release/v1.0.0"),
            pull_request(5, "Five", "fix/five"),
            pull_request(7, "Sync master", "sync/master"),
        ];
        let issues = classifier().collect(10, prs);
        let numbers: Vec<u64> = issues.iter().map(|i| i.pull_request.number).collect();
        assert_eq!(numbers, vec![5, 6]);
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("fix it."), "Fix it");
        assert_eq!(display_title("  padded  "), "padded");
        assert_eq!(display_title("ends.."), "Ends.");
        assert_eq!(display_title(""), "");
    }
}
