use serde::Serialize;

use crate::commands::{load, Context};
use crate::error::{ReleaseError, Result};
use crate::output;
use crate::types::{PublishedRelease, Release};

#[derive(Serialize)]
struct Status {
    latest: Option<PublishedRelease>,
    pending: Option<Release>,
}

pub async fn run(ctx: &Context) -> Result<()> {
    let latest = match ctx.github.latest_release().await {
        Ok(latest) => Some(latest),
        Err(ReleaseError::NoReleases) => None,
        Err(e) => return Err(e),
    };

    let pending = match load::pending_release(ctx).await? {
        Some(summary) => Some(load::release(ctx, summary).await?),
        None => None,
    };

    let status = Status { latest, pending };
    output::print_item(&status, display);

    Ok(())
}

fn display(status: &Status) {
    match &status.latest {
        Some(latest) => println!(
            "Latest release: {} ({})",
            output::version_colored(&latest.version),
            output::format_date(latest.published_at.as_ref())
        ),
        None => println!("No releases published yet"),
    }

    let Some(release) = &status.pending else {
        println!("No pending release. Start one with 'siali start <patch|minor|major>'");
        return;
    };

    println!();
    println!("{}", output::format_summary(release));
    println!(
        "Description: {}",
        output::description_state(release.is_description_in_sync)
    );

    let waiting = release.issues.iter().filter(|issue| !issue.ready).count();
    if waiting > 0 {
        println!("{waiting} of {} issues not ready", release.grouped_issues.len());
    }

    if !release.is_description_in_sync {
        println!();
        println!("Run 'siali description --push' to update the GitHub description");
    }
}
