use crate::commands::{load, Context};
use crate::error::{ReleaseError, Result};
use crate::output;

/// Render a release by version, or the pending release.
pub async fn run(ctx: &Context, version: Option<String>) -> Result<()> {
    let summary = match version {
        Some(version) => ctx.github.release_by_version(&version).await?,
        None => load::pending_release(ctx)
            .await?
            .ok_or(ReleaseError::NoPendingRelease)?,
    };

    let release = load::release(ctx, summary).await?;
    output::print_item(&release, output::render_release);

    Ok(())
}
