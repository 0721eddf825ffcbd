//! Social-preview rasterization with headless Chrome.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};

use devex_render::{CanvasSize, SiteBuilder};

use crate::config::ConfigFile;

const SOCIAL_IMAGE: &str = "devex-growth-social.png";
const PREVIEW_IMAGE: &str = "devex-growth-preview.png";

/// Device pixels per CSS pixel in the captured PNGs.
const CAPTURE_SCALE: f64 = 2.0;

/// What to capture and how long to wait for the browser.
#[derive(Debug, Clone)]
struct CaptureSettings {
    canvas: CanvasSize,
    preview: CanvasSize,
    launch_timeout: Duration,
    load_timeout: Duration,
}

/// Run the image command.
///
/// Writes `social.html` to the output directory, loads it in headless Chrome and
/// captures the full canvas plus a cropped preview. Any failure is fatal.
pub async fn run(config: &ConfigFile) -> Result<()> {
    tracing::info!("Generating social preview image...");

    rasterize(config)
        .await
        .inspect_err(|e| tracing::error!("Social image generation failed: {:#}", e))
}

async fn rasterize(config: &ConfigFile) -> Result<()> {
    let settings = CaptureSettings {
        canvas: config.image.canvas(),
        preview: CanvasSize {
            width: config.image.preview_width,
            height: config.image.preview_height,
        },
        launch_timeout: config.image.launch_timeout(),
        load_timeout: config.image.load_timeout(),
    };

    let builder = SiteBuilder::new(config.build_config())?;
    let canvas = settings.canvas;
    let page = tokio::task::spawn_blocking(move || builder.build_social_page(canvas)).await??;
    let page = page
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", page.display()))?;
    let output_dir = config.output.dir.clone();

    let launch_timeout = settings.launch_timeout;
    let browser = tokio::time::timeout(
        launch_timeout,
        tokio::task::spawn_blocking(move || launch_browser(canvas)),
    )
    .await
    .map_err(|_| {
        anyhow!(
            "Timed out after {}s launching headless Chrome",
            launch_timeout.as_secs()
        )
    })???;

    let written = tokio::task::spawn_blocking(move || {
        capture(&browser, &page, &output_dir, &settings)
    })
    .await??;

    for path in written {
        tracing::info!("Image generated: {}", path.display());
    }

    Ok(())
}

fn launch_browser(canvas: CanvasSize) -> Result<Browser> {
    tracing::debug!("Launching headless Chrome");

    Browser::new(LaunchOptions {
        headless: true,
        sandbox: false,
        window_size: Some((canvas.width, canvas.height)),
        ..Default::default()
    })
    .context("Failed to launch headless Chrome")
}

/// Load `page` and write both screenshots into `output_dir`.
fn capture(
    browser: &Browser,
    page: &Path,
    output_dir: &Path,
    settings: &CaptureSettings,
) -> Result<Vec<PathBuf>> {
    let tab = browser.new_tab().context("Failed to open browser tab")?;
    tab.set_default_timeout(settings.load_timeout);

    let url = format!("file://{}", page.display());
    tab.navigate_to(&url)
        .and_then(|tab| tab.wait_until_navigated())
        .with_context(|| format!("Failed to load {}", url))?;

    let full = tab
        .capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            None,
            Some(clip(settings.canvas)),
            true,
        )
        .context("Failed to capture social image")?;
    let social_path = output_dir.join(SOCIAL_IMAGE);
    fs::write(&social_path, full)
        .with_context(|| format!("Failed to write {}", social_path.display()))?;

    let preview = tab
        .capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            None,
            Some(clip(settings.preview)),
            true,
        )
        .context("Failed to capture preview image")?;
    let preview_path = output_dir.join(PREVIEW_IMAGE);
    fs::write(&preview_path, preview)
        .with_context(|| format!("Failed to write {}", preview_path.display()))?;

    Ok(vec![social_path, preview_path])
}

/// Clip rectangle anchored at the page origin, captured at double resolution.
fn clip(size: CanvasSize) -> Page::Viewport {
    Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: f64::from(size.width),
        height: f64::from(size.height),
        scale: CAPTURE_SCALE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_clip_starts_at_origin() {
        let viewport = clip(CanvasSize {
            width: 600,
            height: 315,
        });

        assert_eq!(viewport.x, 0.0);
        assert_eq!(viewport.y, 0.0);
        assert_eq!(viewport.width, 600.0);
        assert_eq!(viewport.height, 315.0);
        assert_eq!(viewport.scale, 2.0);
    }
}
