use std::fmt;

use serde::{Deserialize, Serialize};

use super::PullRequestRecord;

/// Issue categories, in the order they are rendered in a release description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "bug")]
    Bug,
    #[serde(rename = "story")]
    Story,
    #[serde(rename = "ticket")]
    Ticket,
    #[serde(rename = "chore")]
    Chore,
    #[serde(rename = "e2e test")]
    E2eTest,
    #[serde(rename = "core task")]
    CoreTask,
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "spike")]
    Spike,
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "epic")]
    Epic,
}

impl IssueType {
    pub const COUNT: usize = 10;

    pub const ALL: [IssueType; Self::COUNT] = [
        IssueType::Bug,
        IssueType::Story,
        IssueType::Ticket,
        IssueType::Chore,
        IssueType::E2eTest,
        IssueType::CoreTask,
        IssueType::Unknown,
        IssueType::Spike,
        IssueType::Task,
        IssueType::Epic,
    ];

    /// Position of this type in [`IssueType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            IssueType::Bug => "bug",
            IssueType::Story => "story",
            IssueType::Ticket => "ticket",
            IssueType::Chore => "chore",
            IssueType::E2eTest => "e2e test",
            IssueType::CoreTask => "core task",
            IssueType::Unknown => "unknown",
            IssueType::Spike => "spike",
            IssueType::Task => "task",
            IssueType::Epic => "epic",
        }
    }

    /// Uppercase plural used in description section headers.
    pub fn plural_label(self) -> &'static str {
        match self {
            IssueType::Bug => "BUGS",
            IssueType::Story => "STORIES",
            IssueType::Ticket => "TICKETS",
            IssueType::Chore => "CHORES",
            IssueType::E2eTest => "E2E TESTS",
            IssueType::CoreTask => "CORE TASKS",
            IssueType::Unknown => "UNKNOWNS",
            IssueType::Spike => "SPIKES",
            IssueType::Task => "TASKS",
            IssueType::Epic => "EPICS",
        }
    }

    /// Markdown emoji shortcode, as rendered by GitHub.
    pub fn icon(self) -> &'static str {
        match self {
            IssueType::Bug => ":bug:",
            IssueType::Story => ":book:",
            IssueType::Ticket => ":ticket:",
            IssueType::Chore => ":wrench:",
            IssueType::E2eTest => ":traffic_light:",
            IssueType::CoreTask => ":package:",
            IssueType::Unknown => ":face_palm:",
            IssueType::Spike => ":zap:",
            IssueType::Task => ":white_check_mark:",
            IssueType::Epic => ":crown:",
        }
    }

    /// Terminal glyph for the same category.
    pub fn glyph(self) -> &'static str {
        match self {
            IssueType::Bug => "🐛",
            IssueType::Story => "📖",
            IssueType::Ticket => "🎫",
            IssueType::Chore => "🔧",
            IssueType::E2eTest => "🚦",
            IssueType::CoreTask => "📦",
            IssueType::Unknown => "🤦",
            IssueType::Spike => "⚡",
            IssueType::Task => "✅",
            IssueType::Epic => "👑",
        }
    }

    /// Map a tracking-system issue type name. Sub-tasks are tickets;
    /// anything unrecognised is `Unknown`.
    pub fn from_tracking_name(name: &str) -> Self {
        let name = name.to_lowercase().replace("sub-task", "ticket");
        IssueType::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .unwrap_or(IssueType::Unknown)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Workflow status of a tracking issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Acceptance,
    Review,
    Approved,
    Done,
    Unknown,
}

impl IssueStatus {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "acceptance" => IssueStatus::Acceptance,
            "review" => IssueStatus::Review,
            "approved" => IssueStatus::Approved,
            "done" => IssueStatus::Done,
            _ => IssueStatus::Unknown,
        }
    }

    /// Statuses that mean the work is still in progress.
    pub fn is_blocking(self) -> bool {
        matches!(self, IssueStatus::Acceptance | IssueStatus::Review)
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Acceptance => "acceptance",
            IssueStatus::Review => "review",
            IssueStatus::Approved => "approved",
            IssueStatus::Done => "done",
            IssueStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An issue as stored in the tracking system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingIssue {
    pub key: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub status: IssueStatus,
    pub title: String,
    pub url: String,
}

/// A pull request after branch/title classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubIssue {
    #[serde(flatten)]
    pub pull_request: PullRequestRecord,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub display_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_key: Option<String>,
}

/// A classified pull request with its tracking data attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(flatten)]
    pub pull_request: PullRequestRecord,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub display_title: String,
    pub tracking: Option<TrackingIssue>,
    pub tracking_parent: Option<TrackingIssue>,
    pub status: Vec<IssueStatus>,
    pub ready: bool,
}

impl Issue {
    /// An issue without tracking data is never ready.
    pub fn untracked(issue: GitHubIssue) -> Self {
        Self {
            pull_request: issue.pull_request,
            issue_type: issue.issue_type,
            display_title: issue.display_title,
            tracking: None,
            tracking_parent: None,
            status: Vec::new(),
            ready: false,
        }
    }

    /// Attach tracking data; the tracking type replaces the GitHub-derived one.
    pub fn tracked(
        issue: GitHubIssue,
        tracking: TrackingIssue,
        parent: Option<TrackingIssue>,
    ) -> Self {
        let mut status = vec![tracking.status];
        if let Some(parent) = &parent {
            status.push(parent.status);
        }

        Self {
            pull_request: issue.pull_request,
            issue_type: tracking.issue_type,
            display_title: issue.display_title,
            ready: is_ready(&status),
            tracking: Some(tracking),
            tracking_parent: parent,
            status,
        }
    }

    pub fn number(&self) -> u64 {
        self.pull_request.number
    }
}

/// Ready as soon as any contributing status is outside the blocking set.
pub fn is_ready(status: &[IssueStatus]) -> bool {
    status.iter().any(|s| !s.is_blocking())
}
