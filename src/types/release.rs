use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::{Issue, IssueType, ReleaseSummary};

/// Bump category of a version, decided by its first non-zero component
/// checked in patch, minor, major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticVersion {
    Invalid,
    Patch,
    Minor,
    Major,
}

impl SemanticVersion {
    pub fn label(self) -> &'static str {
        match self {
            SemanticVersion::Invalid => "invalid",
            SemanticVersion::Patch => "patch",
            SemanticVersion::Minor => "minor",
            SemanticVersion::Major => "major",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SemanticVersion::Invalid => "💀",
            SemanticVersion::Patch => "🐁",
            SemanticVersion::Minor => "🐻",
            SemanticVersion::Major => "🐘",
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextVersions {
    pub patch: String,
    pub minor: String,
    pub major: String,
}

impl NextVersions {
    pub fn get(&self, bump: SemanticVersion) -> Option<&str> {
        match bump {
            SemanticVersion::Patch => Some(&self.patch),
            SemanticVersion::Minor => Some(&self.minor),
            SemanticVersion::Major => Some(&self.major),
            SemanticVersion::Invalid => None,
        }
    }
}

/// Issues partitioned by type, one bucket per [`IssueType`].
#[derive(Debug, Clone, Default)]
pub struct GroupedIssues {
    buckets: [Vec<Issue>; IssueType::COUNT],
}

impl GroupedIssues {
    pub(crate) fn push(&mut self, issue: Issue) {
        self.buckets[issue.issue_type.index()].push(issue);
    }

    #[allow(dead_code)]
    pub fn get(&self, issue_type: IssueType) -> &[Issue] {
        &self.buckets[issue_type.index()]
    }

    /// Buckets in render order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (IssueType, &[Issue])> {
        IssueType::ALL
            .into_iter()
            .map(|t| (t, self.buckets[t.index()].as_slice()))
    }

    pub fn non_empty(&self) -> impl Iterator<Item = (IssueType, &[Issue])> {
        self.iter().filter(|(_, issues)| !issues.is_empty())
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for GroupedIssues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(IssueType::COUNT))?;
        for (issue_type, issues) in self.iter() {
            map.serialize_entry(issue_type.name(), issues)?;
        }
        map.end()
    }
}

/// A fully aggregated release.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(flatten)]
    pub summary: ReleaseSummary,
    #[serde(rename = "type")]
    pub release_type: String,
    #[serde(rename = "releaseVersion")]
    pub version: String,
    pub semantic_version: SemanticVersion,
    pub issues: Vec<Issue>,
    pub grouped_issues: GroupedIssues,
    pub local_description: String,
    pub is_description_in_sync: bool,
}

impl Release {
    /// Record that the remote description was overwritten with the local one.
    pub fn mark_description_pushed(&mut self) {
        self.summary.description = self.local_description.clone();
        self.is_description_in_sync = true;
    }
}
