//! Configuration file (devex.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use devex_render::{BuildConfig, CanvasSize};
use devex_server::DevServerConfig;

/// Configuration file structure.
///
/// Every section and key is optional; missing values take the defaults below.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub data: DataConfig,
    pub assets: AssetsConfig,
    pub output: OutputConfig,
    pub image: ImageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("devex-growth.json"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Logo paths in the data file are relative to this directory
    pub base_dir: PathBuf,
    /// Page background; an empty string disables it
    pub background: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            background: "public/bg.png".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub readme: PathBuf,
    pub minify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            readme: PathBuf::from("README.md"),
            minify: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub preview_width: u32,
    pub preview_height: u32,
    pub launch_timeout_secs: u64,
    pub load_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            preview_width: 600,
            preview_height: 315,
            launch_timeout_secs: 60,
            load_timeout_secs: 30,
        }
    }
}

impl ImageConfig {
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_dir: PathBuf::from("public"),
            open: false,
        }
    }
}

impl ConfigFile {
    /// Apply command-line overrides for the output directory and minification.
    pub fn with_overrides(mut self, output: Option<PathBuf>, no_minify: bool) -> Self {
        if let Some(dir) = output {
            self.output.dir = dir;
        }
        if no_minify {
            self.output.minify = false;
        }
        self
    }

    pub fn build_config(&self) -> BuildConfig {
        let background = Some(self.assets.background.trim())
            .filter(|bg| !bg.is_empty())
            .map(str::to_string);

        BuildConfig {
            data_file: self.data.file.clone(),
            asset_dir: self.assets.base_dir.clone(),
            background,
            output_dir: self.output.dir.clone(),
            readme_path: self.output.readme.clone(),
            minify: self.output.minify,
        }
    }

    /// Dev server settings. Besides the data file, the background image and a
    /// `logos/` directory under the asset base are watched when present.
    pub fn dev_server_config(&self, port: Option<u16>, open: bool) -> DevServerConfig {
        let build = self.build_config();

        let mut watch = Vec::new();
        if let Some(bg) = &build.background {
            watch.push(build.asset_dir.join(bg));
        }
        let logos = build.asset_dir.join("logos");
        if logos.is_dir() {
            watch.push(logos);
        }

        DevServerConfig {
            host: self.server.host.clone(),
            port: port.unwrap_or(self.server.port),
            open,
            build,
            public_dir: self.server.public_dir.clone(),
            watch,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}
