//! README generation command.

use anyhow::Result;
use devex_render::SiteBuilder;

use crate::config::ConfigFile;

pub async fn run(config: &ConfigFile) -> Result<()> {
    let builder = SiteBuilder::new(config.build_config())?;
    tokio::task::spawn_blocking(move || builder.build_readme()).await??;

    Ok(())
}
