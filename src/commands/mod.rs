pub mod description;
pub mod init;
pub mod load;
pub mod releases;
pub mod show;
pub mod start;
pub mod status;

use std::io::{self, Write};

use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::Result;
use crate::jira::JiraClient;
use crate::release::{Aggregator, IssueClassifier};

/// Resolved settings and the GitHub client shared by all commands.
pub struct Context {
    pub config: Config,
    pub github: GitHubClient,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let mut github = GitHubClient::new(config.repository()?, config.github_token()?.to_string())?;
        if let Some(endpoint) = &config.github_api_url {
            github = github.with_endpoint(endpoint.as_str());
        }
        Ok(Self { config, github })
    }

    /// Jira settings are only required by commands that aggregate a release.
    pub fn jira(&self) -> Result<JiraClient> {
        JiraClient::new(
            self.config.jira_url()?,
            self.config.jira_user()?.to_string(),
            self.config.jira_token()?.to_string(),
        )
    }

    pub fn aggregator<'a>(&'a self, jira: &'a JiraClient) -> Result<Aggregator<'a, GitHubClient, JiraClient>> {
        let classifier = IssueClassifier::new(self.config.tracking_project())?;
        Ok(Aggregator::new(&self.github, jira, classifier).with_fetch_limit(self.config.fetch_limit()))
    }
}

/// Ask a yes/no question on the terminal.
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    print!("{message} {hint} ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(parse_answer(&input, default))
}

fn parse_answer(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
