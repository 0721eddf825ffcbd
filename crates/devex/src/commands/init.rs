//! Initialize a directory project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
///
/// Writes the config file to `config_path` and a starter data file next to it.
/// Existing files are kept unless `yes` is set.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing devex growth directory...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    write_starter(config_path, DEFAULT_CONFIG, yes)?;
    write_starter(&root.join("devex-growth.json"), DEFAULT_DATA, yes)?;

    let public_dir = root.join("public");
    if !public_dir.exists() {
        fs::create_dir_all(&public_dir).context("Failed to create public directory")?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'devex dev' to start the development server.");

    Ok(())
}

fn write_starter(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# devex configuration

[data]
# Source data file
file = "devex-growth.json"

[assets]
# Logo paths in the data file are resolved against this directory
base_dir = "."
# Page background image; set to "" to disable
background = "public/bg.png"

[output]
# Output directory for index.html, stats.json and images
dir = "dist"
readme = "README.md"
# Minify the embedded stylesheet
minify = true

[image]
width = 1200
height = 630
preview_width = 600
preview_height = 315
launch_timeout_secs = 60
load_timeout_secs = 30

[server]
host = "127.0.0.1"
port = 3000
public_dir = "public"
open = false
"#;

const DEFAULT_DATA: &str = r#"{
  "title": {
    "heading": "Awesome DevEx Growth",
    "subtitle": "Companies where developer experience measurably drives business growth"
  },
  "metadata": {
    "description": "A curated list of companies and tools whose developer experience is backed by growth evidence."
  },
  "impact_levels": {
    "proven": {
      "symbol": "🏆",
      "name": "Proven Growth",
      "description": "Public data showing DX directly drove business growth"
    },
    "measured": {
      "symbol": "📈",
      "name": "Measured Impact",
      "description": "Documented metrics linking DX to adoption or retention"
    },
    "favorite": {
      "symbol": "⭐",
      "name": "Community Favorite",
      "description": "Widely loved by developers, evidence still emerging"
    }
  },
  "categories": [
    {
      "id": "api-first-platforms",
      "name": "API-First Platforms",
      "description": "Products whose API is the product",
      "companies": [
        {
          "name": "Example Co",
          "link": "https://example.com",
          "logo": "",
          "impact": "measured",
          "evidence": "Onboarding time halved after docs rewrite",
          "evidence_link": "https://example.com/blog",
          "key_features": ["Interactive docs", "Copy-paste quickstarts"],
          "why_awesome": "Time to first call under five minutes",
          "description": "An example entry to edit or replace",
          "tags": ["api", "docs"]
        }
      ]
    }
  ],
  "research_links": [],
  "case_studies": [],
  "frameworks": [],
  "reports": []
}
"#;
