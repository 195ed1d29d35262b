use std::io::{self, Write};

use crate::commands::confirm;
use crate::config::Config;
use crate::error::{ReleaseError, Result};

const GITHUB_TOKEN_HELP: &str = "create one at https://github.com/settings/tokens/new";
const JIRA_TOKEN_HELP: &str = "create one at https://id.atlassian.com/manage-profile/security/api-tokens";

fn prompt(label: &str, default: Option<&str>) -> Result<Option<String>> {
    match default {
        Some(default) => print!("{label} [{default}]: "),
        None => print!("{label}: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(default.map(String::from))
    } else {
        Ok(Some(input.to_string()))
    }
}

fn required(label: &str, default: Option<&str>, key: &'static str, env: &'static str) -> Result<String> {
    prompt(label, default)?.ok_or(ReleaseError::MissingSetting { key, env })
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;
    let existing = Config::load()?;

    if config_path.exists()
        && !confirm(
            &format!("Config file already exists at {}. Overwrite?", config_path.display()),
            false,
        )?
    {
        println!("Aborted.");
        return Ok(());
    }

    println!("Siali Configuration");
    println!("===================\n");

    let repository = required(
        "Repository slug (owner/name)",
        existing.repository.as_deref().or(Some("Amsterdam/signals-frontend")),
        "repository",
        "SIALI_REPOSITORY",
    )?;
    let github_token = required(
        &format!("GitHub token ({GITHUB_TOKEN_HELP})"),
        None,
        "github_token",
        "GITHUB_TOKEN",
    )?;
    let jira_url = required(
        "Jira URL",
        existing.jira_url.as_deref().or(Some("https://datapunt.atlassian.net/")),
        "jira_url",
        "JIRA_URL",
    )?;
    let jira_user = required("Jira user (e-mail)", existing.jira_user.as_deref(), "jira_user", "JIRA_USER")?;
    let jira_token = required(
        &format!("Jira token ({JIRA_TOKEN_HELP})"),
        None,
        "jira_token",
        "JIRA_TOKEN",
    )?;
    let tracking_project = prompt("Jira project key", Some(existing.tracking_project()))?;

    let config = Config {
        repository: Some(repository),
        github_token: Some(github_token),
        jira_url: Some(jira_url),
        jira_user: Some(jira_user),
        jira_token: Some(jira_token),
        tracking_project,
        ..existing
    };

    let saved = config.save()?;

    println!("\nConfig saved to {}", saved.display());
    println!("You can now use 'siali' commands!");

    Ok(())
}
