use colored::Colorize;
use tracing::{debug, warn};

use crate::cli::StartArgs;
use crate::commands::{confirm, load, Context};
use crate::error::{ReleaseError, Result};
use crate::output;
use crate::release::next_versions;
use crate::types::SemanticVersion;

/// Branch `release/<version>` off the develop branch and open its pull request.
pub async fn run(ctx: &Context, args: StartArgs) -> Result<()> {
    if let Some(pending) = load::pending_release(ctx).await? {
        warn!(number = pending.number, "Release already pending");
        output::print_message(&format!(
            "Release {} (#{}) is still pending",
            pending.head_ref_name, pending.number
        ));
        return Ok(());
    }

    let latest = ctx.github.latest_release().await?;
    let next = next_versions(&latest.version)?;
    let bump = SemanticVersion::from(args.bump);
    let version = next
        .get(bump)
        .ok_or_else(|| ReleaseError::InvalidVersion(latest.version.clone()))?;

    if !args.yes
        && !confirm(
            &format!("Start new {bump} release ({})?", version.yellow()),
            false,
        )?
    {
        output::print_message("Aborted.");
        return Ok(());
    }

    let branch = format!("release/{version}");
    let develop = ctx.config.develop_branch();
    let oid = ctx.github.last_commit_oid(develop).await?;

    let created = ctx
        .github
        .create_branch(&latest.repository_id, &format!("refs/heads/{branch}"), &oid)
        .await?;
    debug!(id = %created.id, name = %created.name, "Created release branch");

    let pull_request = ctx
        .github
        .create_pull_request(
            &format!("Release/{version}"),
            &latest.repository_id,
            ctx.config.base_branch(),
            &branch,
        )
        .await?;

    output::print_message(&format!(
        "Created {} from {develop} and pull request #{} {}",
        created.name, pull_request.number, pull_request.url
    ));

    Ok(())
}
