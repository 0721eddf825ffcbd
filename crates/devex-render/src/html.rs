//! Interactive HTML directory page.
//!
//! The page is composed bottom-up: company → card, category → section,
//! directory → document. Each step is a pure function over the model.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use minijinja::context;

use devex_model::{Category, Company, Directory, ImpactKey, ImpactLevel};

use crate::assets::{PageAssets, CATEGORY_PALETTE_SIZE};
use crate::templates::{RenderError, TemplateEngine};

/// Inputs to a page render beyond the directory itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Inlined background image, or empty for none
    pub background: String,

    /// Date printed in the footer
    pub generated_on: NaiveDate,

    /// Minify the embedded stylesheet
    pub minify_css: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: String::new(),
            generated_on: Utc::now().date_naive(),
            minify_css: true,
        }
    }
}

/// Renders the directory page.
pub struct HtmlRenderer {
    templates: TemplateEngine,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            templates: TemplateEngine::new()?,
        })
    }

    /// Render the complete document.
    ///
    /// `directory` is expected to carry inlined logos; any logo value is used as
    /// the image source verbatim.
    pub fn render(
        &self,
        directory: &Directory,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let sections = directory
            .categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                self.render_section(index, category, &directory.impact_levels)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let filters: Vec<_> = ImpactKey::ALL
            .iter()
            .map(|key| {
                context! {
                    key => key.as_str(),
                    symbol => directory.impact_symbol(key.as_str()),
                    label => key.filter_label(),
                }
            })
            .collect();

        self.templates.render(
            "page.html",
            context! {
                title => &directory.title,
                total_companies => directory.total_companies(),
                total_categories => directory.categories.len(),
                proven_categories => directory.categories_with_impact(ImpactKey::Proven),
                filters => filters,
                sections => sections,
                generated_on => format_generation_date(options.generated_on),
                stylesheet => PageAssets::stylesheet(options.minify_css),
                script => PageAssets::script(),
                background => &options.background,
            },
        )
    }

    /// Render one category section at display position `index`.
    pub fn render_section(
        &self,
        index: usize,
        category: &Category,
        levels: &BTreeMap<String, ImpactLevel>,
    ) -> Result<String, RenderError> {
        let cards = category
            .companies
            .iter()
            .map(|company| self.render_card(company, levels))
            .collect::<Result<Vec<_>, _>>()?;

        self.templates.render(
            "section.html",
            context! {
                category => category,
                accent => accent_for(index),
                number => index + 1,
                cards => cards,
            },
        )
    }

    /// Render one company card. An unknown impact key renders an empty badge.
    pub fn render_card(
        &self,
        company: &Company,
        levels: &BTreeMap<String, ImpactLevel>,
    ) -> Result<String, RenderError> {
        self.templates.render(
            "card.html",
            context! {
                company => company,
                level => levels.get(&company.impact),
            },
        )
    }
}

/// Palette slot (1-based) for the category at `index`; wraps past the palette size.
pub fn accent_for(index: usize) -> usize {
    index % CATEGORY_PALETTE_SIZE + 1
}

/// Human-readable footer date, e.g. "March 1, 2026".
pub fn format_generation_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devex_model::parse_directory;
    use pretty_assertions::assert_eq;

    fn options() -> RenderOptions {
        RenderOptions {
            background: String::new(),
            generated_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            minify_css: false,
        }
    }

    fn single_company() -> Directory {
        parse_directory(
            r#"{
                "title": { "heading": "Awesome DevEx Growth", "subtitle": "Growth through DX" },
                "impact_levels": {
                    "proven": { "symbol": "🏆", "name": "Proven Growth", "description": "" },
                    "measured": { "symbol": "📈", "name": "Measured", "description": "" },
                    "favorite": { "symbol": "⭐", "name": "Favorite", "description": "" }
                },
                "categories": [
                    { "id": "apis", "name": "APIs", "description": "API-first", "companies": [
                        {
                            "name": "Stripe",
                            "link": "https://stripe.com",
                            "logo": "data:image/png;base64,AAAA",
                            "impact": "proven",
                            "evidence": "Docs",
                            "evidence_link": "https://stripe.com/docs",
                            "key_features": ["Great docs", "Test mode"],
                            "description": "Payments",
                            "tags": ["payments", "api"]
                        }
                    ] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn renders_one_card_per_company() {
        let renderer = HtmlRenderer::new().unwrap();

        let html = renderer.render(&single_company(), &options()).unwrap();

        assert_eq!(html.matches("<article class=\"company-card\"").count(), 1);
        assert!(html.contains("data-impact=\"proven\""));
        assert!(html.contains("data-company=\"stripe\""));
        assert!(html.contains("data-tags=\"payments api\""));
        assert!(html.contains("<li>Great docs</li><li>Test mode</li>"));
        assert!(html.contains("🏆 Proven Growth"));
        assert!(html.contains("Generated on March 1, 2026"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = HtmlRenderer::new().unwrap();
        let dir = single_company();

        let first = renderer.render(&dir, &options()).unwrap();
        let second = renderer.render(&dir, &options()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_directory_has_zero_counts() {
        let renderer = HtmlRenderer::new().unwrap();
        let dir = parse_directory(r#"{ "title": { "heading": "Empty" } }"#).unwrap();

        let html = renderer.render(&dir, &options()).unwrap();

        assert_eq!(html.matches("<span class=\"stat-number\">0</span>").count(), 3);
        assert!(!html.contains("<section class=\"category\""));
    }

    #[test]
    fn unknown_impact_renders_empty_badge() {
        let renderer = HtmlRenderer::new().unwrap();
        let mut dir = single_company();
        dir.categories[0].companies[0].impact = "legendary".to_string();

        let html = renderer.render(&dir, &options()).unwrap();

        assert!(html.contains("data-impact=\"legendary\""));
        assert!(!html.contains("Proven Growth"));
    }

    #[test]
    fn duplicate_names_render_independent_cards() {
        let renderer = HtmlRenderer::new().unwrap();
        let mut dir = single_company();
        let mut second = dir.categories[0].clone();
        second.id = "more".to_string();
        dir.categories.push(second);

        let html = renderer.render(&dir, &options()).unwrap();

        assert_eq!(html.matches("data-company=\"stripe\"").count(), 2);
    }

    #[test]
    fn category_accents_wrap_around_palette() {
        assert_eq!(accent_for(0), 1);
        assert_eq!(accent_for(6), 7);
        assert_eq!(accent_for(7), 1);
        assert_eq!(accent_for(15), 2);
    }

    #[test]
    fn counts_categories_with_proven_companies() {
        let renderer = HtmlRenderer::new().unwrap();
        let mut dir = single_company();
        let mut measured = dir.categories[0].clone();
        measured.id = "measured".to_string();
        measured.companies[0].impact = "measured".to_string();
        dir.categories.push(measured);

        let html = renderer.render(&dir, &options()).unwrap();

        // two companies, two categories, one of them with a proven company
        assert_eq!(html.matches("<span class=\"stat-number\">2</span>").count(), 2);
        assert_eq!(html.matches("<span class=\"stat-number\">1</span>").count(), 1);
    }

    #[test]
    fn embeds_background_only_when_present() {
        let renderer = HtmlRenderer::new().unwrap();
        let dir = single_company();

        let without = renderer.render(&dir, &options()).unwrap();
        let with = renderer
            .render(
                &dir,
                &RenderOptions {
                    background: "data:image/png;base64,QUJD".to_string(),
                    ..options()
                },
            )
            .unwrap();

        assert!(!without.contains("background-image: url("));
        assert!(with.contains("background-image: url('data:image/png;base64,QUJD')"));
    }

    #[test]
    fn formats_footer_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_generation_date(date), "October 19, 2026");
    }
}
