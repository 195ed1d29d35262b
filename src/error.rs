use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("No {key} configured. Set {env} or add {key} to ~/.config/siali/config.toml")]
    MissingSetting { key: &'static str, env: &'static str },

    #[error("Invalid repository slug '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("Invalid tracking project key '{0}'")]
    InvalidProjectKey(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Found {} pending releases, expected 1:\n{}", .candidates.len(), .candidates.join("\n"))]
    AmbiguousPendingRelease { candidates: Vec<String> },

    #[error("No pending release found")]
    NoPendingRelease,

    #[error("Failed to get release: {0}")]
    ReleaseNotFound(String),

    #[error("Release #{0} has no pull request data")]
    PullRequestNotFound(u64),

    #[error("Tracking issue not found: {0}")]
    TrackingIssueNotFound(String),

    #[error("Branch '{0}' does not decompose into <type>/<version>")]
    MalformedBranch(String),

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("No releases published yet")]
    NoReleases,
}

impl ReleaseError {
    /// Whether the error reflects a release state that needs manual resolution.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousPendingRelease { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
