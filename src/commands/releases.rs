use tabled::Tabled;

use crate::commands::Context;
use crate::error::Result;
use crate::output::{self, truncate};
use crate::release::{classify_version, next_versions};
use crate::types::PublishedRelease;

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Type")]
    bump: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Draft")]
    draft: String,
}

impl From<&PublishedRelease> for ReleaseRow {
    fn from(release: &PublishedRelease) -> Self {
        let semantic_version = classify_version(&release.version);
        Self {
            version: format!("{} {}", semantic_version.icon(), release.version),
            bump: output::semantic_version_colored(semantic_version),
            name: truncate(release.name.as_deref().unwrap_or_default(), 40),
            published: output::format_date(release.published_at.as_ref()),
            draft: if release.is_draft { "yes" } else { "" }.to_string(),
        }
    }
}

pub async fn list(ctx: &Context, limit: u32) -> Result<()> {
    let releases = ctx.github.last_releases(limit).await?;
    output::print_table(&releases, |release| ReleaseRow::from(release));
    Ok(())
}

pub async fn next(ctx: &Context) -> Result<()> {
    let latest = ctx.github.latest_release().await?;
    let next = next_versions(&latest.version)?;

    output::print_item(&next, |next| {
        println!("Latest:  {}", output::version_colored(&latest.version));
        println!("Patch:   {}", next.patch);
        println!("Minor:   {}", next.minor);
        println!("Major:   {}", next.major);
    });

    Ok(())
}
