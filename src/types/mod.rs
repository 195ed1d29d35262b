mod issue;
mod pull_request;
mod release;

pub use issue::{GitHubIssue, Issue, IssueStatus, IssueType, TrackingIssue};
pub use pull_request::{PublishedRelease, PullRequestRecord, ReleaseSummary};
pub use release::{GroupedIssues, NextVersions, Release, SemanticVersion};
