use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::commands::Context;
use crate::error::Result;
use crate::output;
use crate::release::{select_pending, Progress};
use crate::types::{Release, ReleaseSummary};

const PENDING_LIMIT: u32 = 100;

/// The open release pull request; fails when there is more than one.
pub async fn pending_release(ctx: &Context) -> Result<Option<ReleaseSummary>> {
    let candidates = ctx
        .github
        .pending_releases(ctx.config.base_branch(), PENDING_LIMIT)
        .await?;
    select_pending(candidates)
}

/// Aggregate a release, reporting tracking lookups on a progress bar.
pub async fn release(ctx: &Context, summary: ReleaseSummary) -> Result<Release> {
    info!(number = summary.number, "Loading release");

    let jira = ctx.jira()?;
    let aggregator = ctx.aggregator(&jira)?;

    let bar = if output::is_json_output() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(
        ProgressStyle::with_template("Jira - link issues [{bar:40}] {percent}% | {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░"),
    );

    let release = aggregator
        .aggregate(summary, |Progress { completed, total }| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        })
        .await;

    bar.finish_and_clear();
    release
}
