//! Release aggregation: classify the pull requests merged into a release,
//! attach tracking data, group them and render the description.

mod classify;
mod describe;
mod enrich;
mod group;
mod version;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{ReleaseError, Result};
use crate::types::{Issue, PullRequestRecord, Release, ReleaseSummary};

pub use classify::{IssueClassifier, DEFAULT_PROJECT_KEY};
pub use describe::format_description;
pub use enrich::{enrich, Tracker, TrackerRecord};
pub use group::group_issues;
pub use version::{classify_version, next_versions};

pub const DEFAULT_FETCH_LIMIT: u32 = 250;

/// Source of the pull requests merged into a release pull request.
#[async_trait]
pub trait Hosting: Send + Sync {
    async fn release_pull_requests(
        &self,
        release_number: u64,
        limit: u32,
    ) -> Result<Vec<PullRequestRecord>>;
}

/// Emitted after each tracking lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

pub struct Aggregator<'a, H: ?Sized, T: ?Sized> {
    hosting: &'a H,
    tracker: &'a T,
    classifier: IssueClassifier,
    fetch_limit: u32,
}

impl<'a, H, T> Aggregator<'a, H, T>
where
    H: Hosting + ?Sized,
    T: Tracker + ?Sized,
{
    pub fn new(hosting: &'a H, tracker: &'a T, classifier: IssueClassifier) -> Self {
        Self {
            hosting,
            tracker,
            classifier,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_fetch_limit(mut self, limit: u32) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Aggregate a release. Tracking lookups run one at a time so `on_progress`
    /// sees a strictly increasing count; the first failure aborts the run.
    pub async fn aggregate<F>(&self, summary: ReleaseSummary, mut on_progress: F) -> Result<Release>
    where
        F: FnMut(Progress),
    {
        info!(number = summary.number, title = %summary.title, "Aggregating release");

        let pull_requests = self
            .hosting
            .release_pull_requests(summary.number, self.fetch_limit)
            .await?;
        debug!(count = pull_requests.len(), "Fetched release pull requests");

        let classified = self.classifier.collect(summary.number, pull_requests);
        let total = classified
            .iter()
            .filter(|issue| issue.tracking_key.is_some())
            .count();

        let mut completed = 0;
        let mut issues = Vec::with_capacity(classified.len());
        for github_issue in classified {
            let tracked = github_issue.tracking_key.is_some();
            issues.push(enrich(self.tracker, github_issue).await?);

            if tracked {
                completed += 1;
                on_progress(Progress { completed, total });
            }
        }

        finalize(summary, issues)
    }
}

/// Assemble a release from its summary and enriched issues.
pub fn finalize(summary: ReleaseSummary, issues: Vec<Issue>) -> Result<Release> {
    let (release_type, version) = parse_branch(&summary.head_ref_name)?;

    let grouped_issues = group_issues(&issues);
    let local_description = format_description(&grouped_issues);
    let is_description_in_sync = local_description == summary.description;
    let semantic_version = classify_version(&version);

    debug!(
        version = %version,
        semantic_version = %semantic_version,
        in_sync = is_description_in_sync,
        "Finalized release"
    );

    Ok(Release {
        summary,
        release_type,
        version,
        semantic_version,
        issues,
        grouped_issues,
        local_description,
        is_description_in_sync,
    })
}

/// Split a head branch such as `release/v1.2.0` into its last two segments.
pub fn parse_branch(head_ref_name: &str) -> Result<(String, String)> {
    let mut segments = head_ref_name.rsplit('/');
    match (segments.next(), segments.next()) {
        (Some(version), Some(release_type)) if !version.is_empty() && !release_type.is_empty() => {
            Ok((release_type.to_string(), version.to_string()))
        }
        _ => Err(ReleaseError::MalformedBranch(head_ref_name.to_string())),
    }
}

/// The single open release pull request, if any. Several candidates is an
/// inconsistent state that has to be fixed by hand.
pub fn select_pending(mut candidates: Vec<ReleaseSummary>) -> Result<Option<ReleaseSummary>> {
    if candidates.len() > 1 {
        return Err(ReleaseError::AmbiguousPendingRelease {
            candidates: candidates
                .iter()
                .map(|release| format!("{} draft: {}", release.title, release.is_draft))
                .collect(),
        });
    }
    Ok(candidates.pop())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{Hosting, Tracker, TrackerRecord};
    use crate::error::{ReleaseError, Result};
    use crate::types::{Issue, IssueStatus, IssueType, PullRequestRecord, ReleaseSummary, TrackingIssue};

    pub fn pull_request(number: u64, title: &str, head: &str) -> PullRequestRecord {
        PullRequestRecord {
            pull_request_id: format!("PR_{number}"),
            number,
            title: title.to_string(),
            head_ref_name: head.to_string(),
            description: String::new(),
            url: format!("https://github.com/acme/app/pull/{number}"),
            author: None,
            state: "MERGED".to_string(),
            is_draft: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn release_summary(number: u64, head: &str, description: &str) -> ReleaseSummary {
        ReleaseSummary {
            pull_request_id: format!("PR_{number}"),
            number,
            title: head.to_string(),
            head_ref_name: head.to_string(),
            description: description.to_string(),
            url: format!("https://github.com/acme/app/pull/{number}"),
            state: "OPEN".to_string(),
            is_draft: false,
            version: None,
            repository_id: None,
            published_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn record(key: &str, type_name: &str, status_name: &str, title: &str) -> TrackerRecord {
        TrackerRecord {
            key: key.to_string(),
            type_name: type_name.to_string(),
            status_name: status_name.to_string(),
            title: title.to_string(),
            url: format!("https://jira.test/browse/{key}"),
            parent: None,
        }
    }

    pub fn issue(number: u64, issue_type: IssueType, title: &str) -> Issue {
        Issue {
            pull_request: pull_request(number, title, "misc"),
            issue_type,
            display_title: title.to_string(),
            tracking: None,
            tracking_parent: None,
            status: Vec::new(),
            ready: false,
        }
    }

    pub fn tracked_issue(number: u64, issue_type: IssueType, title: &str, key: &str) -> Issue {
        let mut issue = issue(number, issue_type, title);
        issue.tracking = Some(TrackingIssue {
            key: key.to_string(),
            issue_type,
            status: IssueStatus::Done,
            title: title.to_string(),
            url: format!("https://jira.test/browse/{key}"),
        });
        issue.status = vec![IssueStatus::Done];
        issue.ready = true;
        issue
    }

    #[derive(Default)]
    pub struct FakeTracker {
        records: HashMap<String, TrackerRecord>,
        lookups: AtomicUsize,
    }

    impl FakeTracker {
        pub fn with(records: Vec<TrackerRecord>) -> Self {
            Self {
                records: records.into_iter().map(|r| (r.key.clone(), r)).collect(),
                lookups: AtomicUsize::new(0),
            }
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Tracker for FakeTracker {
        async fn issue(&self, key: &str) -> Result<TrackerRecord> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.records
                .get(key)
                .cloned()
                .ok_or_else(|| ReleaseError::TrackingIssueNotFound(key.to_string()))
        }
    }

    pub struct FakeHosting {
        pub pull_requests: Vec<PullRequestRecord>,
    }

    #[async_trait]
    impl Hosting for FakeHosting {
        async fn release_pull_requests(
            &self,
            _release_number: u64,
            limit: u32,
        ) -> Result<Vec<PullRequestRecord>> {
            Ok(self.pull_requests.iter().take(limit as usize).cloned().collect())
        }
    }
}
