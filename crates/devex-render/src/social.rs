//! Social-preview page, sized for rasterization by a headless browser.

use minijinja::context;

use devex_model::{Company, Directory, ImpactKey};

use crate::templates::{RenderError, TemplateEngine};

/// Maximum number of proven companies shown on the preview.
pub const FEATURED_LIMIT: usize = 6;

const TAGLINE: &str = "Tools and practices that demonstrably drive business growth through exceptional developer experience";

/// Pixel dimensions of the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
        }
    }
}

/// Up to [`FEATURED_LIMIT`] proven companies, in model order.
pub fn featured_companies(directory: &Directory) -> Vec<&Company> {
    directory
        .companies()
        .filter(|c| c.has_impact(ImpactKey::Proven))
        .take(FEATURED_LIMIT)
        .collect()
}

/// Render the preview markup. Pure: no filesystem or browser access.
pub fn render_social(directory: &Directory, size: CanvasSize) -> Result<String, RenderError> {
    let templates = TemplateEngine::new()?;

    templates.render(
        "social.html",
        context! {
            width => size.width,
            height => size.height,
            heading => &directory.title.heading,
            tagline => TAGLINE,
            total_companies => directory.total_companies(),
            total_categories => directory.categories.len(),
            featured => featured_companies(directory),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use devex_model::parse_directory;

    fn directory(proven: usize, measured: usize) -> Directory {
        let companies: Vec<_> = (0..proven)
            .map(|i| serde_json::json!({ "name": format!("P{}", i), "link": "#", "impact": "proven" }))
            .chain((0..measured).map(|i| {
                serde_json::json!({ "name": format!("M{}", i), "link": "#", "impact": "measured" })
            }))
            .collect();
        let source = serde_json::json!({
            "title": { "heading": "Awesome DevEx Growth" },
            "categories": [ { "id": "a", "name": "A", "companies": companies } ],
        });
        parse_directory(&source.to_string()).unwrap()
    }

    #[test]
    fn features_at_most_six_proven_companies() {
        let dir = directory(9, 2);

        let featured = featured_companies(&dir);

        assert_eq!(featured.len(), FEATURED_LIMIT);
        assert_eq!(featured[0].name, "P0");
        assert_eq!(featured[5].name, "P5");
    }

    #[test]
    fn does_not_pad_short_selection() {
        let dir = directory(2, 5);

        let html = render_social(&dir, CanvasSize::default()).unwrap();

        assert_eq!(html.matches("<div class=\"company-logo\">").count(), 2);
        assert!(html.contains("<span class=\"stat-number\">7</span>"));
    }

    #[test]
    fn sizes_body_to_canvas() {
        let dir = directory(0, 0);

        let html = render_social(
            &dir,
            CanvasSize {
                width: 800,
                height: 418,
            },
        )
        .unwrap();

        assert!(html.contains("width: 800px;"));
        assert!(html.contains("height: 418px;"));
        assert!(html.contains("Awesome DevEx Growth"));
    }
}
