use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};
use crate::release::{DEFAULT_FETCH_LIMIT, DEFAULT_PROJECT_KEY};

const DEFAULT_BASE_BRANCH: &str = "master";
const DEFAULT_DEVELOP_BRANCH: &str = "develop";

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    pub repository: Option<String>,
    pub github_token: Option<String>,
    /// GraphQL endpoint, for GitHub Enterprise installations
    pub github_api_url: Option<String>,
    pub jira_url: Option<String>,
    pub jira_user: Option<String>,
    pub jira_token: Option<String>,
    pub base_branch: Option<String>,
    pub develop_branch: Option<String>,
    pub tracking_project: Option<String>,
    pub fetch_limit: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ReleaseError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| ReleaseError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ReleaseError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;
        }

        std::fs::write(&config_path, toml::to_string(self)?).map_err(|e| ReleaseError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;

        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "siali")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ReleaseError::NoConfigDir)
    }

    /// Layer explicit values (flags, environment) over the file.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            repository: overrides.repository.or(self.repository),
            github_token: overrides.github_token.or(self.github_token),
            github_api_url: overrides.github_api_url.or(self.github_api_url),
            jira_url: overrides.jira_url.or(self.jira_url),
            jira_user: overrides.jira_user.or(self.jira_user),
            jira_token: overrides.jira_token.or(self.jira_token),
            base_branch: overrides.base_branch.or(self.base_branch),
            develop_branch: overrides.develop_branch.or(self.develop_branch),
            tracking_project: overrides.tracking_project.or(self.tracking_project),
            fetch_limit: overrides.fetch_limit.or(self.fetch_limit),
        }
    }

    pub fn repository(&self) -> Result<&str> {
        required(&self.repository, "repository", "SIALI_REPOSITORY")
    }

    pub fn github_token(&self) -> Result<&str> {
        required(&self.github_token, "github_token", "GITHUB_TOKEN")
    }

    pub fn jira_url(&self) -> Result<&str> {
        required(&self.jira_url, "jira_url", "JIRA_URL")
    }

    pub fn jira_user(&self) -> Result<&str> {
        required(&self.jira_user, "jira_user", "JIRA_USER")
    }

    pub fn jira_token(&self) -> Result<&str> {
        required(&self.jira_token, "jira_token", "JIRA_TOKEN")
    }

    pub fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    pub fn develop_branch(&self) -> &str {
        self.develop_branch.as_deref().unwrap_or(DEFAULT_DEVELOP_BRANCH)
    }

    pub fn tracking_project(&self) -> &str {
        self.tracking_project.as_deref().unwrap_or(DEFAULT_PROJECT_KEY)
    }

    pub fn fetch_limit(&self) -> u32 {
        self.fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT)
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str, env: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ReleaseError::MissingSetting { key, env })
}
