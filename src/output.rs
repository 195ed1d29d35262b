use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::types::{Issue, IssueStatus, IssueType, Release, SemanticVersion, TrackingIssue};

/// Global output format setting
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
    } else {
        display(item);
    }
}

/// Print a message (skipped in JSON mode, or prints simple object)
pub fn print_message(message: &str) {
    if is_json_output() {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

pub fn version_colored(version: &str) -> String {
    version.yellow().to_string()
}

pub fn semantic_version_colored(semantic_version: SemanticVersion) -> String {
    let label = semantic_version.label();
    match semantic_version {
        SemanticVersion::Patch => label.yellow().to_string(),
        SemanticVersion::Minor => label.magenta().to_string(),
        SemanticVersion::Major => label.red().to_string(),
        SemanticVersion::Invalid => label.bright_black().to_string(),
    }
}

pub fn description_state(in_sync: bool) -> String {
    if in_sync {
        "in sync".green().to_string()
    } else {
        "out of sync".red().to_string()
    }
}

pub fn status_colored(status: IssueStatus) -> String {
    let label = status.label();
    match status {
        IssueStatus::Done | IssueStatus::Approved => label.green().to_string(),
        IssueStatus::Review => label.magenta().to_string(),
        IssueStatus::Acceptance => label.blue().to_string(),
        IssueStatus::Unknown => label.bright_black().to_string(),
    }
}

pub fn format_header(release: &Release) -> String {
    format!(
        "{} {} [{}]",
        release.release_type,
        version_colored(&release.version),
        release.summary.state.yellow()
    )
}

/// One line: header plus a count per non-empty category.
pub fn format_summary(release: &Release) -> String {
    let counts: Vec<String> = release
        .grouped_issues
        .non_empty()
        .map(|(issue_type, issues)| format!("{} {}", issues.len(), issue_type.glyph()))
        .collect();

    if counts.is_empty() {
        format_header(release)
    } else {
        format!("{} | {}", format_header(release), counts.join(" | "))
    }
}

pub fn format_section_header(issue_type: IssueType, count: usize) -> String {
    format!("{} {} ({count})", issue_type.glyph(), issue_type.plural_label())
        .bold()
        .to_string()
}

fn format_tracking(tracking: &TrackingIssue) -> String {
    format!(
        "    {} [{}] {}",
        tracking.key.cyan(),
        status_colored(tracking.status),
        tracking.title
    )
}

fn format_issue(issue: &Issue) -> String {
    let marker = if issue.ready {
        "✔".green().to_string()
    } else {
        "✘".red().to_string()
    };
    format!(
        "{} {} {}",
        marker,
        format!("#{}", issue.number()).blue(),
        issue.display_title
    )
}

/// Detailed, terminal-oriented view of a release.
pub fn render_release(release: &Release) {
    println!("{}", format_header(release));
    println!();

    for (issue_type, issues) in release.grouped_issues.non_empty() {
        println!("{}", format_section_header(issue_type, issues.len()));
        println!();

        for issue in issues {
            println!("{}", format_issue(issue));
            if let Some(parent) = &issue.tracking_parent {
                println!("{}", format_tracking(parent));
            }
            if let Some(tracking) = &issue.tracking {
                println!("{}", format_tracking(tracking));
            }
        }

        println!();
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Format a timestamp as a date
pub fn format_date(timestamp: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    timestamp
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
