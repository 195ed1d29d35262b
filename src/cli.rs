use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::Config;
use crate::types::SemanticVersion;

#[derive(Parser)]
#[command(name = "siali")]
#[command(about = "Release manager for GitHub pull requests linked to Jira issues", version)]
#[command(after_help = "EXAMPLES:
    siali status                      Show the pending release
    siali show v1.4.0                 Show the issues of a release
    siali description --push          Update the GitHub description
    siali start minor                 Start a new minor release")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show the full error chain and debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Settings that override ~/.config/siali/config.toml
#[derive(Args, Clone, Default)]
pub struct SettingsArgs {
    /// Repository slug (owner/name)
    #[arg(long, global = true, env = "SIALI_REPOSITORY")]
    pub repository: Option<String>,

    /// GitHub personal access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Jira base URL
    #[arg(long, global = true, env = "JIRA_URL")]
    pub jira_url: Option<String>,

    /// Jira user (e-mail)
    #[arg(long, global = true, env = "JIRA_USER")]
    pub jira_user: Option<String>,

    /// Jira API token
    #[arg(long, global = true, env = "JIRA_TOKEN", hide_env_values = true)]
    pub jira_token: Option<String>,

    /// Jira project key used in branch names and titles (default: SIG)
    #[arg(long, global = true)]
    pub tracking_project: Option<String>,
}

impl SettingsArgs {
    pub fn into_config(self) -> Config {
        Config {
            repository: self.repository,
            github_token: self.github_token,
            jira_url: self.jira_url,
            jira_user: self.jira_user,
            jira_token: self.jira_token,
            tracking_project: self.tracking_project,
            ..Config::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest and the pending release
    #[command(after_help = "EXAMPLES:
    siali status
    siali status --json")]
    Status,
    /// Show the issues of a release (pending release when no version is given)
    #[command(after_help = "EXAMPLES:
    siali show
    siali show v1.4.0")]
    Show {
        /// Release version, e.g. v1.4.0
        version: Option<String>,
    },
    /// List the last published releases
    #[command(after_help = "EXAMPLES:
    siali releases
    siali releases --limit 25")]
    Releases {
        /// Number of releases to list
        #[arg(long, short, default_value = "10")]
        limit: u32,
    },
    /// Show the next patch, minor and major versions
    Next,
    /// Start a new release branch and pull request
    #[command(after_help = "EXAMPLES:
    siali start patch
    siali start major --yes")]
    Start(StartArgs),
    /// Show or update the description of the pending release
    #[command(after_help = "EXAMPLES:
    siali description
    siali description --remote
    siali description --push --yes")]
    Description(DescriptionArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    siali completions bash > ~/.bash_completion.d/siali
    siali completions zsh > ~/.zfunc/_siali")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Bump {
    Patch,
    Minor,
    Major,
}

impl From<Bump> for SemanticVersion {
    fn from(bump: Bump) -> Self {
        match bump {
            Bump::Patch => SemanticVersion::Patch,
            Bump::Minor => SemanticVersion::Minor,
            Bump::Major => SemanticVersion::Major,
        }
    }
}

#[derive(Args)]
pub struct StartArgs {
    /// Which version component to bump
    #[arg(value_enum)]
    pub bump: Bump,

    /// Do not ask for confirmation
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct DescriptionArgs {
    /// Show the description stored on GitHub instead of the local one
    #[arg(long, conflicts_with = "push")]
    pub remote: bool,

    /// Replace the GitHub description with the local one
    #[arg(long)]
    pub push: bool,

    /// Do not ask for confirmation
    #[arg(long, short)]
    pub yes: bool,
}
