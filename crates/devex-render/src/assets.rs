//! Asset handling: image inlining and the page stylesheet/script.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rayon::prelude::*;
use regex::Regex;

use devex_model::Directory;

static XML_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\?xml.*?\?>").expect("valid regex"));
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!DOCTYPE.*?>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Errors raised while encoding a single image. Never escapes [`AssetInliner::inline`].
#[derive(Debug, thiserror::Error)]
enum AssetError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("SVG is not valid UTF-8: {0}")]
    InvalidSvg(#[from] std::string::FromUtf8Error),
}

/// Converts image references into `data:` URIs.
#[derive(Debug, Clone)]
pub struct AssetInliner {
    base_dir: PathBuf,
}

impl AssetInliner {
    /// Create an inliner resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Inline an image reference.
    ///
    /// Returns an empty string for empty, missing or unreadable references; failures
    /// are logged and never propagated. Remote URLs and existing data URIs are
    /// returned unchanged.
    pub fn inline(&self, reference: &str) -> String {
        if reference.is_empty() {
            return String::new();
        }

        if is_passthrough(reference) {
            return reference.to_string();
        }

        let path = self.resolve(reference);
        if !path.exists() {
            tracing::warn!("Image not found: {}", reference);
            return String::new();
        }

        match encode(&path) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!("Error loading image {}: {}", reference, e);
                String::new()
            }
        }
    }

    /// Clone `directory` with every company logo replaced by its inlined form.
    ///
    /// Lookups are independent, so they run in parallel; order is preserved.
    pub fn process_directory(&self, directory: &Directory) -> Directory {
        let mut processed = directory.clone();

        processed.categories.par_iter_mut().for_each(|category| {
            category.companies.par_iter_mut().for_each(|company| {
                company.logo = self.inline(&company.logo);
            });
        });

        processed
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

fn is_passthrough(reference: &str) -> bool {
    reference.starts_with("data:")
        || reference.starts_with("http://")
        || reference.starts_with("https://")
}

/// Encode a file as a data URI, trusting its extension for the MIME type.
fn encode(path: &Path) -> Result<String, AssetError> {
    let bytes = fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ext == "svg" {
        let svg = normalize_svg(&String::from_utf8(bytes)?);
        return Ok(format!(
            "data:image/svg+xml;base64,{}",
            BASE64_STANDARD.encode(svg)
        ));
    }

    Ok(format!(
        "data:image/{};base64,{}",
        ext,
        BASE64_STANDARD.encode(bytes)
    ))
}

/// Strip the XML declaration and DOCTYPE and collapse whitespace.
pub(crate) fn normalize_svg(svg: &str) -> String {
    let svg = XML_DECLARATION.replace(svg, "");
    let svg = DOCTYPE.replace(&svg, "");
    WHITESPACE.replace_all(&svg, " ").trim().to_string()
}

/// Stylesheet and script embedded in the generated page.
pub struct PageAssets;

impl PageAssets {
    /// The page stylesheet, minified when requested.
    ///
    /// Falls back to the readable stylesheet if minification fails.
    pub fn stylesheet(minify: bool) -> String {
        if !minify {
            return PAGE_CSS.to_string();
        }

        match Self::minify_css(PAGE_CSS) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("{}", e);
                PAGE_CSS.to_string()
            }
        }
    }

    /// The client-side filtering script.
    pub fn script() -> &'static str {
        PAGE_JS
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// Number of category accent colors; category icons cycle through them.
pub const CATEGORY_PALETTE_SIZE: usize = 7;

const PAGE_CSS: &str = r#":root {
  --bg-color: #fafafa;
  --bg-secondary: #ffffff;
  --text-primary: #1a1a1a;
  --text-secondary: #666666;
  --text-tertiary: #999999;
  --border-color: #e5e5e5;
  --border-hover: #d1d1d1;
  --accent-color: #0066cc;
  --accent-light: #f0f7ff;

  --proven-color: #059669;
  --proven-bg: #ecfdf5;
  --measured-color: #dc2626;
  --measured-bg: #fef2f2;
  --favorite-color: #7c3aed;
  --favorite-bg: #f3f4f6;

  --cat-1: #3b82f6;
  --cat-2: #10b981;
  --cat-3: #f59e0b;
  --cat-4: #ef4444;
  --cat-5: #8b5cf6;
  --cat-6: #06b6d4;
  --cat-7: #f97316;

  --shadow-sm: 0 1px 2px 0 rgb(0 0 0 / 0.05);
  --shadow-md: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1);
  --shadow-lg: 0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1);
}

* {
  box-sizing: border-box;
}

body {
  font-family: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
  background-color: var(--bg-color);
  color: var(--text-primary);
  margin: 0;
  padding: 0;
  line-height: 1.6;
  background-repeat: no-repeat;
  background-position: top right;
  background-size: 30% auto;
}

.container {
  max-width: 1200px;
  margin: 0 auto;
  padding: 2rem;
}

.header {
  text-align: center;
  margin-bottom: 3rem;
  padding: 3rem 0;
  background: linear-gradient(135deg, var(--accent-light) 0%, var(--bg-secondary) 100%);
  border-radius: 1rem;
  box-shadow: var(--shadow-md);
}

.header h1 {
  font-family: "JetBrains Mono", monospace;
  font-size: clamp(2rem, 5vw, 3.5rem);
  font-weight: 700;
  margin: 0;
  letter-spacing: -0.02em;
}

.header .subtitle {
  font-size: 1.25rem;
  color: var(--text-secondary);
  margin: 1rem auto;
  max-width: 800px;
}

.stats {
  display: flex;
  justify-content: center;
  gap: 2rem;
  margin-top: 2rem;
  flex-wrap: wrap;
}

.stat {
  background: var(--bg-secondary);
  padding: 1rem 1.5rem;
  border-radius: 0.5rem;
  box-shadow: var(--shadow-sm);
  border: 1px solid var(--border-color);
}

.stat-number {
  font-family: "JetBrains Mono", monospace;
  font-size: 2rem;
  font-weight: 700;
  color: var(--accent-color);
  display: block;
}

.stat-label {
  font-size: 0.875rem;
  color: var(--text-secondary);
  text-transform: uppercase;
  letter-spacing: 0.05em;
}

.filters {
  background: var(--bg-secondary);
  border-radius: 1rem;
  padding: 1.5rem;
  margin-bottom: 2rem;
  box-shadow: var(--shadow-md);
  border: 1px solid var(--border-color);
}

.filter-group {
  display: flex;
  gap: 1rem;
  align-items: center;
  margin-bottom: 1rem;
  flex-wrap: wrap;
}

.filter-group:last-child {
  margin-bottom: 0;
}

.filter-label {
  font-weight: 500;
  min-width: 100px;
}

.search-input {
  flex: 1;
  max-width: 400px;
  padding: 0.75rem 1rem;
  border: 2px solid var(--border-color);
  border-radius: 0.5rem;
  font-size: 1rem;
  transition: border-color 0.2s ease;
}

.search-input:focus {
  outline: none;
  border-color: var(--accent-color);
}

.filter-buttons {
  display: flex;
  gap: 0.5rem;
  flex-wrap: wrap;
}

.filter-btn {
  padding: 0.5rem 1rem;
  border: 2px solid var(--border-color);
  background: var(--bg-secondary);
  border-radius: 2rem;
  font-size: 0.875rem;
  cursor: pointer;
  transition: all 0.2s ease;
  font-weight: 500;
}

.filter-btn:hover {
  border-color: var(--border-hover);
  transform: translateY(-1px);
}

.filter-btn.active {
  background: var(--accent-color);
  color: white;
  border-color: var(--accent-color);
}

.categories {
  display: grid;
  gap: 2rem;
}

.category {
  background: var(--bg-secondary);
  border-radius: 1rem;
  padding: 2rem;
  box-shadow: var(--shadow-md);
  border: 1px solid var(--border-color);
  transition: all 0.3s ease;
}

.category:hover {
  transform: translateY(-2px);
  box-shadow: var(--shadow-lg);
}

.category-header {
  display: flex;
  align-items: center;
  gap: 1rem;
  margin-bottom: 1.5rem;
  padding-bottom: 1rem;
  border-bottom: 2px solid var(--border-color);
}

.category-icon {
  width: 3rem;
  height: 3rem;
  border-radius: 0.75rem;
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 1.5rem;
  font-weight: 600;
  color: white;
}

.cat-1 { background: var(--cat-1); }
.cat-2 { background: var(--cat-2); }
.cat-3 { background: var(--cat-3); }
.cat-4 { background: var(--cat-4); }
.cat-5 { background: var(--cat-5); }
.cat-6 { background: var(--cat-6); }
.cat-7 { background: var(--cat-7); }

.category-title {
  font-family: "JetBrains Mono", monospace;
  font-size: 1.5rem;
  font-weight: 600;
  margin: 0;
}

.category-description {
  color: var(--text-secondary);
  margin: 0.5rem 0 0 0;
  font-size: 0.95rem;
}

.companies-grid {
  display: grid;
  gap: 1rem;
  grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
}

.company-card {
  background: var(--bg-color);
  border: 2px solid var(--border-color);
  border-radius: 0.75rem;
  padding: 1.5rem;
  transition: all 0.2s ease;
  cursor: pointer;
  position: relative;
  overflow: hidden;
}

.company-card:hover {
  border-color: var(--accent-color);
  transform: translateY(-1px);
  box-shadow: var(--shadow-sm);
}

.company-header {
  display: flex;
  align-items: center;
  gap: 1rem;
  margin-bottom: 1rem;
}

.company-logo {
  width: 48px;
  height: 48px;
  border-radius: 0.5rem;
  object-fit: contain;
  background: var(--bg-secondary);
  padding: 0.25rem;
  border: 1px solid var(--border-color);
}

.company-info h3 {
  margin: 0;
  font-size: 1.25rem;
  font-weight: 600;
}

.company-info a {
  color: var(--text-primary);
  text-decoration: none;
}

.company-info a:hover {
  color: var(--accent-color);
}

.impact-badge {
  padding: 0.25rem 0.75rem;
  border-radius: 1rem;
  font-size: 0.75rem;
  font-weight: 500;
  display: inline-flex;
  align-items: center;
  gap: 0.25rem;
  margin-top: 0.25rem;
}

.impact-proven {
  background: var(--proven-bg);
  color: var(--proven-color);
}

.impact-measured {
  background: var(--measured-bg);
  color: var(--measured-color);
}

.impact-favorite {
  background: var(--favorite-bg);
  color: var(--favorite-color);
}

.company-description {
  color: var(--text-secondary);
  margin-bottom: 1rem;
  font-size: 0.95rem;
}

.company-features {
  margin-bottom: 1rem;
}

.feature-list {
  display: none;
  margin-top: 0.5rem;
  padding-left: 1rem;
}

.feature-list.expanded {
  display: block;
}

.feature-list li {
  color: var(--text-secondary);
  font-size: 0.875rem;
  margin-bottom: 0.25rem;
}

.expand-features {
  color: var(--accent-color);
  background: none;
  border: none;
  cursor: pointer;
  font-size: 0.875rem;
  font-weight: 500;
  padding: 0;
}

.evidence-link {
  display: inline-flex;
  align-items: center;
  gap: 0.5rem;
  color: var(--accent-color);
  text-decoration: none;
  font-size: 0.875rem;
  font-weight: 500;
  margin-top: 0.5rem;
}

.evidence-link:hover {
  text-decoration: underline;
}

.footer {
  text-align: center;
  padding: 3rem 0;
  margin-top: 4rem;
  border-top: 2px solid var(--border-color);
  color: var(--text-secondary);
}

.footer p {
  margin: 0.5rem 0;
}

.hidden {
  display: none;
}

@media (max-width: 768px) {
  .container {
    padding: 1rem;
  }

  .header {
    padding: 2rem 1rem;
  }

  .stats {
    gap: 1rem;
  }

  .filter-group {
    flex-direction: column;
    align-items: flex-start;
  }

  .filter-label {
    min-width: auto;
  }

  .companies-grid {
    grid-template-columns: 1fr;
  }
}
"#;

const PAGE_JS: &str = r##"(function() {
  'use strict';

  const searchInput = document.getElementById('searchInput');
  const filterButtons = document.querySelectorAll('.filter-btn');
  const categories = document.querySelectorAll('.category');

  let currentImpactFilter = 'all';

  function filterContent() {
    const searchTerm = searchInput.value.toLowerCase();

    categories.forEach(category => {
      let categoryVisible = false;

      category.querySelectorAll('.company-card').forEach(card => {
        const matchesSearch = !searchTerm ||
          card.dataset.company.includes(searchTerm) ||
          card.dataset.tags.toLowerCase().includes(searchTerm) ||
          card.textContent.toLowerCase().includes(searchTerm);

        const matchesImpact = currentImpactFilter === 'all' ||
          card.dataset.impact === currentImpactFilter;

        if (matchesSearch && matchesImpact) {
          card.classList.remove('hidden');
          categoryVisible = true;
        } else {
          card.classList.add('hidden');
        }
      });

      category.classList.toggle('hidden', !categoryVisible);
    });
  }

  searchInput.addEventListener('input', filterContent);

  filterButtons.forEach(btn => {
    btn.addEventListener('click', () => {
      filterButtons.forEach(b => b.classList.remove('active'));
      btn.classList.add('active');
      currentImpactFilter = btn.dataset.impact;
      filterContent();
    });
  });

  document.querySelectorAll('.expand-features').forEach(button => {
    button.addEventListener('click', event => {
      event.stopPropagation();
      const featureList = button.nextElementSibling;

      if (featureList.classList.contains('expanded')) {
        featureList.classList.remove('expanded');
        button.textContent = 'View Key Features →';
      } else {
        featureList.classList.add('expanded');
        button.textContent = 'Hide Key Features ↑';
      }
    });
  });

  document.querySelectorAll('a[href^="#"]').forEach(anchor => {
    anchor.addEventListener('click', function(e) {
      const target = document.querySelector(this.getAttribute('href'));
      if (target) {
        e.preventDefault();
        target.scrollIntoView({ behavior: 'smooth' });
      }
    });
  });
})();
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    // 1x1 transparent PNG
    const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89,
    ];

    #[test]
    fn empty_reference_is_empty() {
        let inliner = AssetInliner::new(".");
        assert_eq!(inliner.inline(""), "");
    }

    #[test]
    fn missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let inliner = AssetInliner::new(temp.path());

        assert_eq!(inliner.inline("logos/nope.png"), "");
    }

    #[test]
    fn unreadable_svg_is_empty() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.svg"), [0xFF, 0xFE, 0x00, 0xC3]).unwrap();
        let inliner = AssetInliner::new(temp.path());

        assert_eq!(inliner.inline("broken.svg"), "");
    }

    #[test]
    fn directory_reference_is_empty() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("logo.png")).unwrap();
        let inliner = AssetInliner::new(temp.path());

        assert_eq!(inliner.inline("logo.png"), "");
    }

    #[test]
    fn inlines_png_with_extension_mime() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("logo.PNG"), PNG).unwrap();
        let inliner = AssetInliner::new(temp.path());

        let uri = inliner.inline("logo.PNG");

        assert_eq!(
            uri,
            format!("data:image/png;base64,{}", BASE64_STANDARD.encode(PNG))
        );
    }

    #[test]
    fn inlines_svg_without_preamble() {
        let temp = tempdir().unwrap();
        let svg = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n<svg xmlns=\"http://www.w3.org/2000/svg\">\n\t<rect   width=\"1\"\r\n height=\"1\"/>\n</svg>\n";
        fs::write(temp.path().join("logo.svg"), svg).unwrap();
        let inliner = AssetInliner::new(temp.path());

        let uri = inliner.inline("logo.svg");
        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = String::from_utf8(BASE64_STANDARD.decode(encoded).unwrap()).unwrap();

        assert!(!decoded.contains("<?xml"));
        assert!(!decoded.contains("<!DOCTYPE"));
        assert_eq!(
            decoded,
            "<svg xmlns=\"http://www.w3.org/2000/svg\"> <rect width=\"1\" height=\"1\"/> </svg>"
        );
    }

    #[test]
    fn passes_through_urls() {
        let inliner = AssetInliner::new(".");

        assert_eq!(
            inliner.inline("https://example.com/logo.png"),
            "https://example.com/logo.png"
        );
        assert_eq!(inliner.inline("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn processes_every_company_logo() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.png"), PNG).unwrap();
        let dir = devex_model::parse_directory(
            r##"{
                "title": { "heading": "X" },
                "categories": [
                    { "id": "a", "name": "A", "companies": [
                        { "name": "Good", "link": "#", "impact": "proven", "logo": "a.png" },
                        { "name": "Broken", "link": "#", "impact": "proven", "logo": "missing.png" }
                    ] }
                ]
            }"##,
        )
        .unwrap();

        let processed = AssetInliner::new(temp.path()).process_directory(&dir);
        let companies = &processed.categories[0].companies;

        assert!(companies[0].logo.starts_with("data:image/png;base64,"));
        assert_eq!(companies[1].logo, "");
        assert_eq!(dir.categories[0].companies[0].logo, "a.png");
    }

    #[test]
    fn minifies_stylesheet() {
        let css = PageAssets::stylesheet(true);

        assert!(!css.contains('\n'));
        assert!(css.contains(".company-card"));
    }

    #[test]
    fn script_wires_filters() {
        let js = PageAssets::script();

        assert!(js.contains("searchInput"));
        assert!(js.contains("currentImpactFilter"));
        assert!(js.contains("scrollIntoView"));
        assert!(js.contains(r##"a[href^="#"]"##));
        assert!(js.trim_end().ends_with("})();"));
    }
}
