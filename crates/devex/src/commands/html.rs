//! HTML-only build command.

use anyhow::Result;
use devex_render::SiteBuilder;

use crate::config::ConfigFile;

/// Run the html command: page and stats, no README.
pub async fn run(config: &ConfigFile) -> Result<()> {
    let builder = SiteBuilder::new(config.build_config())?;
    let outcome = tokio::task::spawn_blocking(move || builder.build_html()).await??;

    let breakdown = &outcome.stats.impact_breakdown;
    tracing::info!(
        "Impact: {} proven, {} measured, {} community favorites",
        breakdown.proven,
        breakdown.measured,
        breakdown.favorite
    );

    Ok(())
}
