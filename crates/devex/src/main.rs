//! devex CLI - generator and dev server for the awesome-devex-growth directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "devex")]
#[command(about = "Render the DevEx growth directory to HTML, README and a social image")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to devex.toml config file
    #[arg(short, long, default_value = "devex.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter devex.toml and data file
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate the HTML page, stats and README
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip stylesheet minification
        #[arg(long)]
        no_minify: bool,

        /// Also rasterize the social-preview images
        #[arg(long)]
        image: bool,
    },

    /// Generate only the HTML page and stats
    Html {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip stylesheet minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Generate only the README
    Readme,

    /// Rasterize the social-preview images with headless Chrome
    Image {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start development server with hot reload
    Dev {
        /// Port to listen on (defaults to config or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Open a browser once the server is up
        #[arg(long, conflicts_with = "no_open")]
        open: bool,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // init is the only command that runs without a config file
    let load_config = || config::load_config(&cli.config);

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            no_minify,
            image,
        } => {
            let settings = load_config()?.with_overrides(output, no_minify);
            commands::build::run(&settings).await?;
            if image {
                commands::image::run(&settings).await?;
            }
        }
        Commands::Html { output, no_minify } => {
            let settings = load_config()?.with_overrides(output, no_minify);
            commands::html::run(&settings).await?;
        }
        Commands::Readme => {
            commands::readme::run(&load_config()?).await?;
        }
        Commands::Image { output } => {
            let settings = load_config()?.with_overrides(output, false);
            commands::image::run(&settings).await?;
        }
        Commands::Dev {
            port,
            open,
            no_open,
        } => {
            let file_config = load_config()?;
            let open = !no_open && (open || file_config.server.open);
            commands::dev::run(&file_config, port, open).await?;
        }
    }

    Ok(())
}
