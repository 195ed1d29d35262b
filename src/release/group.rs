use crate::types::{GroupedIssues, Issue};

/// Partition issues by type, keeping encounter order inside each bucket.
pub fn group_issues(issues: &[Issue]) -> GroupedIssues {
    issues
        .iter()
        .cloned()
        .fold(GroupedIssues::default(), |mut grouped, issue| {
            grouped.push(issue);
            grouped
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::fixtures::issue;
    use crate::types::IssueType;

    #[test]
    fn test_group_preserves_order() {
        let issues = vec![
            issue(3, IssueType::Bug, "Third"),
            issue(1, IssueType::Chore, "First"),
            issue(2, IssueType::Bug, "Second"),
            issue(4, IssueType::Epic, "Fourth"),
        ];
        let grouped = group_issues(&issues);

        let bugs: Vec<u64> = grouped.get(IssueType::Bug).iter().map(Issue::number).collect();
        assert_eq!(bugs, vec![3, 2]);
        assert_eq!(grouped.get(IssueType::Chore).len(), 1);
        assert_eq!(grouped.get(IssueType::Epic).len(), 1);
        assert!(grouped.get(IssueType::Story).is_empty());
        assert_eq!(grouped.len(), issues.len());
    }

    #[test]
    fn test_group_empty() {
        let grouped = group_issues(&[]);
        assert!(grouped.is_empty());
        assert_eq!(grouped.non_empty().count(), 0);
        assert_eq!(grouped.iter().count(), IssueType::COUNT);
    }

    #[test]
    fn test_every_issue_in_one_bucket() {
        let issues: Vec<Issue> = IssueType::ALL
            .iter()
            .enumerate()
            .map(|(n, t)| issue(n as u64 + 1, *t, "x"))
            .collect();
        let grouped = group_issues(&issues);

        for (issue_type, bucket) in grouped.iter() {
            assert_eq!(bucket.len(), 1);
            assert_eq!(bucket[0].issue_type, issue_type);
        }
    }
}
