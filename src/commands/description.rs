use crate::cli::DescriptionArgs;
use crate::commands::{confirm, load, Context};
use crate::error::{ReleaseError, Result};
use crate::output;

pub async fn run(ctx: &Context, args: DescriptionArgs) -> Result<()> {
    let summary = load::pending_release(ctx)
        .await?
        .ok_or(ReleaseError::NoPendingRelease)?;
    let mut release = load::release(ctx, summary).await?;

    if args.remote {
        output::print_message(&release.summary.description);
        return Ok(());
    }

    if !args.push {
        output::print_message(&release.local_description);
        if !output::is_json_output() {
            println!();
            println!(
                "GitHub #{}: {}",
                release.summary.number,
                output::description_state(release.is_description_in_sync)
            );
        }
        return Ok(());
    }

    if release.is_description_in_sync {
        output::print_message("Description already in sync");
        return Ok(());
    }

    if !args.yes && !confirm("Do you want to update the GitHub description?", false)? {
        output::print_message("Aborted.");
        return Ok(());
    }

    ctx.github
        .update_description(&release.summary.pull_request_id, &release.local_description)
        .await?;
    release.mark_description_pushed();

    output::print_message(&format!(
        "Updated description of #{} ({})",
        release.summary.number,
        output::description_state(release.is_description_in_sync)
    ));

    Ok(())
}
