//! Development server command.

use anyhow::Result;
use devex_server::DevServer;

use crate::config::ConfigFile;

/// Run the dev server.
pub async fn run(config: &ConfigFile, port: Option<u16>, open: bool) -> Result<()> {
    let server_config = config.dev_server_config(port, open);

    tracing::info!(
        "Starting development server on port {}",
        server_config.port
    );
    tracing::info!("Watching {}", server_config.build.data_file.display());

    DevServer::new(server_config).start().await?;

    Ok(())
}
