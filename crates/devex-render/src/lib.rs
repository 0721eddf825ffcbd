//! Renderers for the devex-growth directory.
//!
//! Turns a loaded [`Directory`](devex_model::Directory) into a self-contained HTML page,
//! a README and a social-preview page, and sequences the writes to the output directory.

pub mod assets;
pub mod builder;
pub mod html;
pub mod readme;
pub mod social;
pub mod templates;

pub use assets::{AssetInliner, PageAssets};
pub use builder::{BuildConfig, BuildError, BuildResult, HtmlOutcome, SiteBuilder};
pub use html::{HtmlRenderer, RenderOptions};
pub use readme::render_readme;
pub use social::{featured_companies, render_social, CanvasSize, FEATURED_LIMIT};
pub use templates::{RenderError, TemplateEngine};
