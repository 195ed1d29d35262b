//! Attach tracking-system data to classified pull requests.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::types::{GitHubIssue, Issue, IssueStatus, IssueType, TrackingIssue};

/// Title marker for end-to-end test issues.
const TEST_MARKER: &str = "[TEST]";

/// An issue as the tracking system reports it, before type mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerRecord {
    pub key: String,
    pub type_name: String,
    pub status_name: String,
    pub title: String,
    pub url: String,
    pub parent: Option<Box<TrackerRecord>>,
}

/// Lookup of a single issue in the tracking system.
///
/// A key that does not resolve is an error, never a placeholder.
#[async_trait]
pub trait Tracker: Send + Sync {
    async fn issue(&self, key: &str) -> Result<TrackerRecord>;
}

/// Resolve the tracking data of an issue; issues without a key skip the lookup.
pub async fn enrich<T: Tracker + ?Sized>(tracker: &T, issue: GitHubIssue) -> Result<Issue> {
    let Some(key) = issue.tracking_key.clone() else {
        return Ok(Issue::untracked(issue));
    };

    debug!(key = %key, number = issue.pull_request.number, "Fetching tracking issue");
    let record = tracker.issue(&key).await?;
    let (tracking, parent) = tracking_issues(record);

    Ok(Issue::tracked(issue, tracking, parent))
}

/// Map a tracker record and its parent. A parent marked as an e2e test
/// makes the child one too.
fn tracking_issues(mut record: TrackerRecord) -> (TrackingIssue, Option<TrackingIssue>) {
    let parent = record.parent.take().map(|parent| to_tracking_issue(*parent));
    let mut tracking = to_tracking_issue(record);

    if parent.as_ref().map(|p| p.issue_type) == Some(IssueType::E2eTest) {
        tracking.issue_type = IssueType::E2eTest;
    }

    (tracking, parent)
}

fn to_tracking_issue(record: TrackerRecord) -> TrackingIssue {
    TrackingIssue {
        issue_type: issue_type(&record.title, &record.type_name),
        status: IssueStatus::from_name(&record.status_name),
        title: strip_test_marker(&record.title),
        key: record.key,
        url: record.url,
    }
}

fn issue_type(title: &str, type_name: &str) -> IssueType {
    if title.starts_with(TEST_MARKER) {
        return IssueType::E2eTest;
    }
    IssueType::from_tracking_name(type_name)
}

fn strip_test_marker(title: &str) -> String {
    title.replacen("[TEST] ", "", 1)
}
