//! Canonical release description, compared byte for byte with the body
//! stored on the release pull request.

use crate::types::{GroupedIssues, Issue, IssueType};

pub fn format_description(grouped: &GroupedIssues) -> String {
    grouped
        .non_empty()
        .map(|(issue_type, issues)| format_section(issue_type, issues))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_section(issue_type: IssueType, issues: &[Issue]) -> String {
    let mut lines = Vec::with_capacity(issues.len() + 2);
    lines.push(format!(
        "## {} {} ({})",
        issue_type.icon(),
        issue_type.plural_label(),
        issues.len()
    ));
    lines.push(String::new());
    lines.extend(issues.iter().map(format_line));
    lines.join("\n")
}

fn format_line(issue: &Issue) -> String {
    match &issue.tracking {
        Some(tracking) => format!(
            "#{} [{}]({}) {}",
            issue.number(),
            tracking.key,
            tracking.url,
            issue.display_title
        ),
        None => format!("#{} {}", issue.number(), issue.display_title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::fixtures::{issue, tracked_issue};
    use crate::release::group_issues;

    #[test]
    fn test_format_description() {
        let issues = vec![
            tracked_issue(12, IssueType::Story, "Add map layer", "SIG-1"),
            issue(13, IssueType::Bug, "Fix typo"),
            issue(14, IssueType::Chore, "Update deps"),
            issue(15, IssueType::Bug, "Fix crash"),
        ];
        let description = format_description(&group_issues(&issues));

        assert_eq!(
            description,
            "## :bug: BUGS (2)\n\
             \n\
             #13 Fix typo\n\
             #15 Fix crash\n\
             \n\
             ## :book: STORIES (1)\n\
             \n\
             #12 [SIG-1](https://jira.test/browse/SIG-1) Add map layer\n\
             \n\
             ## :wrench: CHORES (1)\n\
             \n\
             #14 Update deps"
        );
    }

    #[test]
    fn test_format_description_empty() {
        assert_eq!(format_description(&group_issues(&[])), "");
    }

    #[test]
    fn test_format_description_is_stable() {
        let issues = vec![
            issue(1, IssueType::CoreTask, "Dashboard"),
            issue(2, IssueType::E2eTest, "Login flow"),
            issue(3, IssueType::Unknown, "Misc"),
        ];
        let first = format_description(&group_issues(&issues));
        let second = format_description(&group_issues(&issues));
        assert_eq!(first, second);
        assert!(first.contains("## :traffic_light: E2E TESTS (1)"));
        assert!(first.contains("## :package: CORE TASKS (1)"));
        assert!(first.contains("## :face_palm: UNKNOWNS (1)"));
    }
}
