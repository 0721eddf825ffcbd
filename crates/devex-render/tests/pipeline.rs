//! End-to-end generation against a temporary project directory.

use std::fs;
use std::path::Path;

use devex_model::Stats;
use devex_render::{BuildConfig, BuildError, SiteBuilder};
use tempfile::tempdir;

// 1x1 PNG header is enough: the inliner trusts the extension.
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const ONE_PROVEN: &str = r#"{
    "title": { "heading": "Awesome DevEx Growth", "subtitle": "DX that grows businesses" },
    "metadata": { "description": "A curated list." },
    "impact_levels": {
        "proven": { "symbol": "🏆", "name": "Proven Growth", "description": "Public numbers" },
        "measured": { "symbol": "📈", "name": "Measured Impact", "description": "Some data" },
        "favorite": { "symbol": "⭐", "name": "Community Favorite", "description": "Loved" }
    },
    "categories": [
        {
            "id": "api-first",
            "name": "API-First Platforms",
            "description": "Developer-first APIs",
            "companies": [
                {
                    "name": "Stripe",
                    "link": "https://stripe.com",
                    "logo": "logos/stripe.png",
                    "impact": "proven",
                    "evidence": "Docs drive adoption",
                    "evidence_link": "https://stripe.com/blog",
                    "key_features": ["Seven lines of code"],
                    "why_awesome": "Set the bar",
                    "description": "Payments infrastructure",
                    "tags": ["payments"]
                }
            ]
        }
    ]
}"#;

fn project(root: &Path, data: &str) -> BuildConfig {
    fs::write(root.join("devex-growth.json"), data).unwrap();
    BuildConfig {
        data_file: root.join("devex-growth.json"),
        asset_dir: root.to_path_buf(),
        background: Some("public/bg.png".to_string()),
        output_dir: root.join("dist"),
        readme_path: root.join("README.md"),
        minify: false,
    }
}

#[test]
fn single_proven_company_end_to_end() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("logos")).unwrap();
    fs::write(temp.path().join("logos/stripe.png"), PNG).unwrap();
    let builder = SiteBuilder::new(project(temp.path(), ONE_PROVEN)).unwrap();

    let outcome = builder.build_html().unwrap();

    let html = fs::read_to_string(&outcome.html_path).unwrap();
    assert_eq!(html.matches("<article class=\"company-card\"").count(), 1);
    assert_eq!(html.matches("data-impact=\"proven\"").count(), 2); // card + filter button
    assert!(html.contains("src=\"data:image"));

    let stats: Stats =
        serde_json::from_str(&fs::read_to_string(&outcome.stats_path).unwrap()).unwrap();
    assert_eq!(stats.total_companies, 1);
    assert_eq!(stats.impact_breakdown.proven, 1);
    assert_eq!(stats.impact_breakdown.measured, 0);
    assert_eq!(stats.impact_breakdown.favorite, 0);
    assert_eq!(stats.categories[0].id, "api-first");
}

#[test]
fn broken_logos_do_not_abort_render() {
    let temp = tempdir().unwrap();
    let builder = SiteBuilder::new(project(temp.path(), ONE_PROVEN)).unwrap();

    let outcome = builder.build_html().unwrap();

    let html = fs::read_to_string(outcome.html_path).unwrap();
    assert!(html.contains("<img src=\"\" alt=\"Stripe logo\""));
}

#[test]
fn empty_categories_end_to_end() {
    let temp = tempdir().unwrap();
    let builder = SiteBuilder::new(project(
        temp.path(),
        r#"{ "title": { "heading": "Empty" }, "categories": [] }"#,
    ))
    .unwrap();

    builder.build_all().unwrap();

    let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
    assert_eq!(html.matches("<span class=\"stat-number\">0</span>").count(), 3);
    assert!(!html.contains("<section class=\"category\""));

    let readme = fs::read_to_string(temp.path().join("README.md")).unwrap();
    let contents: Vec<&str> = readme
        .lines()
        .skip_while(|l| *l != "## Contents")
        .skip(1)
        .take_while(|l| !l.starts_with("## "))
        .filter(|l| l.starts_with("- ["))
        .collect();
    assert_eq!(
        contents,
        vec![
            "- [Growth Evidence & Case Studies](#growth-evidence--case-studies)",
            "- [Research & Metrics](#research--metrics)",
        ]
    );
}

#[test]
fn malformed_json_writes_nothing() {
    let temp = tempdir().unwrap();
    let truncated = &ONE_PROVEN[..ONE_PROVEN.len() / 3];
    let builder = SiteBuilder::new(project(temp.path(), truncated)).unwrap();

    let err = builder.build_all().unwrap_err();

    assert!(matches!(err, BuildError::Load(_)));
    assert!(!temp.path().join("dist").exists());
    assert!(!temp.path().join("README.md").exists());
}

#[test]
fn duplicate_names_across_categories() {
    let temp = tempdir().unwrap();
    let data = ONE_PROVEN.replacen(
        r#""categories": ["#,
        r#""categories": [
        { "id": "again", "name": "Again", "companies": [
            { "name": "Stripe", "link": "https://stripe.com", "impact": "measured" }
        ] },"#,
        1,
    );
    let builder = SiteBuilder::new(project(temp.path(), &data)).unwrap();

    builder.build_all().unwrap();

    let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
    assert_eq!(html.matches("data-company=\"stripe\"").count(), 2);

    let readme = fs::read_to_string(temp.path().join("README.md")).unwrap();
    assert!(readme.contains("**S:** Stripe, Stripe  "));
}
