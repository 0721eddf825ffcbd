//! Full site build command.

use anyhow::Result;
use devex_render::SiteBuilder;

use crate::config::ConfigFile;

/// Run the build command: HTML page, stats and README.
pub async fn run(config: &ConfigFile) -> Result<()> {
    tracing::info!("Building DevEx growth directory...");

    let builder = SiteBuilder::new(config.build_config())?;
    let result = tokio::task::spawn_blocking(move || builder.build_all()).await??;

    tracing::info!(
        "Built {} companies in {} categories in {}ms",
        result.companies,
        result.categories,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
