//! Build orchestration: load → inline → render → write.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Local, Utc};

use devex_model::{load_directory, Directory, ModelError, Stats};

use crate::assets::AssetInliner;
use crate::html::{HtmlRenderer, RenderOptions};
use crate::readme::render_readme;
use crate::social::{render_social, CanvasSize};
use crate::templates::RenderError;

/// Configuration for generating the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source JSON data file
    pub data_file: PathBuf,

    /// Base directory logo paths are resolved against
    pub asset_dir: PathBuf,

    /// Optional page background, relative to `asset_dir`
    pub background: Option<String>,

    /// Output directory for HTML, stats and images
    pub output_dir: PathBuf,

    /// Where the README is written
    pub readme_path: PathBuf,

    /// Minify the embedded stylesheet
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("devex-growth.json"),
            asset_dir: PathBuf::from("."),
            background: Some("public/bg.png".to_string()),
            output_dir: PathBuf::from("dist"),
            readme_path: PathBuf::from("README.md"),
            minify: true,
        }
    }
}

/// Result of a full build.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of companies rendered
    pub companies: usize,

    /// Number of categories rendered
    pub categories: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Files written by an HTML build.
#[derive(Debug)]
pub struct HtmlOutcome {
    pub html_path: PathBuf,
    pub stats_path: PathBuf,
    pub stats: Stats,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] ModelError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to serialize stats: {0}")]
    Serialize(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    html: HtmlRenderer,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        Ok(Self {
            config,
            html: HtmlRenderer::new()?,
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Generate the HTML page and its stats file.
    ///
    /// The data file is loaded before anything is written, so a malformed source
    /// leaves the output directory untouched.
    pub fn build_html(&self) -> Result<HtmlOutcome, BuildError> {
        let directory = load_directory(&self.config.data_file)?;

        tracing::info!("Processing company logos...");
        let inliner = AssetInliner::new(&self.config.asset_dir);
        let processed = inliner.process_directory(&directory);
        let background = self
            .config
            .background
            .as_deref()
            .map(|bg| inliner.inline(bg))
            .unwrap_or_default();

        let now = Utc::now();
        let html = self.html.render(
            &processed,
            &RenderOptions {
                background,
                generated_on: now.with_timezone(&Local).date_naive(),
                minify_css: self.config.minify,
            },
        )?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| write_error(&self.config.output_dir, e))?;

        let html_path = self.config.output_dir.join("index.html");
        fs::write(&html_path, html).map_err(|e| write_error(&html_path, e))?;
        tracing::info!("HTML generated: {}", html_path.display());

        let stats = Stats::compute(&processed, now);
        let json = stats
            .to_json()
            .map_err(|e| BuildError::Serialize(e.to_string()))?;
        let stats_path = self.config.output_dir.join("stats.json");
        fs::write(&stats_path, json).map_err(|e| write_error(&stats_path, e))?;
        tracing::info!(
            "Statistics generated: {} ({} companies, {} categories)",
            stats_path.display(),
            stats.total_companies,
            stats.total_categories
        );

        Ok(HtmlOutcome {
            html_path,
            stats_path,
            stats,
        })
    }

    /// Generate the README from the raw model.
    pub fn build_readme(&self) -> Result<PathBuf, BuildError> {
        let directory = load_directory(&self.config.data_file)?;
        let readme = render_readme(&directory);

        let path = self.config.readme_path.clone();
        ensure_parent(&path)?;
        fs::write(&path, readme).map_err(|e| write_error(&path, e))?;

        tracing::info!(
            "README generated: {} ({} companies, {} categories)",
            path.display(),
            directory.total_companies(),
            directory.categories.len()
        );

        Ok(path)
    }

    /// Write the social-preview page to `<output>/social.html` for rasterization.
    pub fn build_social_page(&self, size: CanvasSize) -> Result<PathBuf, BuildError> {
        let directory = load_directory(&self.config.data_file)?;
        let processed = AssetInliner::new(&self.config.asset_dir).process_directory(&directory);
        let html = render_social(&processed, size)?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| write_error(&self.config.output_dir, e))?;

        let path = self.config.output_dir.join("social.html");
        fs::write(&path, html).map_err(|e| write_error(&path, e))?;

        Ok(path)
    }

    /// Generate the HTML page, stats and README.
    ///
    /// No rollback: if the README fails, the HTML and stats already written stay.
    pub fn build_all(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let outcome = self.build_html()?;
        self.build_readme()?;

        Ok(BuildResult {
            companies: outcome.stats.total_companies,
            categories: outcome.stats.total_categories,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Load the data file without rendering.
    pub fn load(&self) -> Result<Directory, BuildError> {
        Ok(load_directory(&self.config.data_file)?)
    }
}

fn ensure_parent(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))
        }
        _ => Ok(()),
    }
}

fn write_error(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(root: &Path) -> BuildConfig {
        BuildConfig {
            data_file: root.join("devex-growth.json"),
            asset_dir: root.to_path_buf(),
            background: None,
            output_dir: root.join("dist"),
            readme_path: root.join("README.md"),
            minify: false,
        }
    }

    #[test]
    fn builds_readme_into_nested_path() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("devex-growth.json"),
            r#"{ "title": { "heading": "Nested" } }"#,
        )
        .unwrap();
        let config = BuildConfig {
            readme_path: temp.path().join("docs/README.md"),
            ..config_in(temp.path())
        };

        let path = SiteBuilder::new(config).unwrap().build_readme().unwrap();

        assert!(fs::read_to_string(path).unwrap().starts_with("# Nested"));
    }

    #[test]
    fn build_all_reports_counts() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("devex-growth.json"),
            r##"{ "title": { "heading": "X" }, "categories": [
                { "id": "a", "name": "A", "companies": [
                    { "name": "One", "link": "#", "impact": "measured" },
                    { "name": "Two", "link": "#", "impact": "proven" }
                ] }
            ] }"##,
        )
        .unwrap();

        let result = SiteBuilder::new(config_in(temp.path()))
            .unwrap()
            .build_all()
            .unwrap();

        assert_eq!(result.companies, 2);
        assert_eq!(result.categories, 1);
        assert!(temp.path().join("README.md").exists());
        assert!(temp.path().join("dist/index.html").exists());
    }

    #[test]
    fn writes_social_page() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("devex-growth.json"),
            r#"{ "title": { "heading": "Social" } }"#,
        )
        .unwrap();

        let path = SiteBuilder::new(config_in(temp.path()))
            .unwrap()
            .build_social_page(CanvasSize::default())
            .unwrap();

        assert_eq!(path, temp.path().join("dist/social.html"));
        assert!(fs::read_to_string(path).unwrap().contains("width: 1200px;"));
    }
}
