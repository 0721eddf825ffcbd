//! Template engine for the generated pages.

use minijinja::{Environment, Value};

/// Errors that can occur while rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to register template {name}: {message}")]
    Register { name: String, message: String },

    #[error("Failed to render template {name}: {message}")]
    Template { name: String, message: String },
}

/// Template engine using minijinja.
///
/// Templates are `.html` so minijinja auto-escapes every interpolated value;
/// pre-rendered fragments are passed through with the `safe` filter.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();

        for (name, source) in [
            ("card.html", CARD_TEMPLATE),
            ("section.html", SECTION_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
            ("social.html", SOCIAL_TEMPLATE),
        ] {
            env.add_template_owned(name.to_string(), source.to_string())
                .map_err(|e| RenderError::Register {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { env })
    }

    /// Render the named template with a serializable context.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, RenderError> {
        let err = |e: minijinja::Error| RenderError::Template {
            name: name.to_string(),
            message: e.to_string(),
        };

        self.env.get_template(name).map_err(err)?.render(ctx).map_err(err)
    }
}

const CARD_TEMPLATE: &str = r##"<article class="company-card"
         data-company="{{ company.name | lower }}"
         data-impact="{{ company.impact }}"
         data-tags="{{ company.tags | join(" ") }}">
  <div class="company-header">
    <img src="{{ company.logo }}" alt="{{ company.name }} logo" class="company-logo" onerror="this.style.display='none'">
    <div class="company-info">
      <h3><a href="{{ company.link }}" target="_blank" rel="noopener">{{ company.name }}</a></h3>
      <div class="impact-badge impact-{{ company.impact }}">
        {% if level %}{{ level.symbol }} {{ level.name }}{% endif %}
      </div>
    </div>
  </div>

  <p class="company-description">{{ company.description }}</p>

  <div class="company-features">
    <button class="expand-features" type="button">View Key Features →</button>
    <ul class="feature-list">
      {% for feature in company.key_features %}<li>{{ feature }}</li>{% endfor %}
    </ul>
  </div>

  <a href="{{ company.evidence_link }}" target="_blank" rel="noopener" class="evidence-link">
    📊 {{ company.evidence }} →
  </a>
</article>"##;

const SECTION_TEMPLATE: &str = r##"<section class="category" id="{{ category.id }}" data-category="{{ category.id }}">
  <header class="category-header">
    <div class="category-icon cat-{{ accent }}">{{ number }}</div>
    <div>
      <h2 class="category-title">{{ category.name }}</h2>
      <p class="category-description">{{ category.description }}</p>
    </div>
  </header>

  <div class="companies-grid">
    {% for card in cards %}{{ card | safe }}
    {% endfor %}
  </div>
</section>"##;

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title.heading }} - Interactive Directory</title>
  <meta name="description" content="{{ title.subtitle }}">
  <meta property="og:title" content="{{ title.heading }}">
  <meta property="og:description" content="{{ title.subtitle }}">
  <meta property="og:type" content="website">

  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&family=JetBrains+Mono:wght@400;500;600&display=swap" rel="stylesheet">

  <style>{{ stylesheet | safe }}</style>
  {% if background %}<style>body { background-image: url('{{ background | safe }}'); }</style>{% endif %}
</head>
<body>
  <div class="container">
    <header class="header">
      <h1>{{ title.heading }}</h1>
      <p class="subtitle">{{ title.subtitle }}</p>
      <div class="stats">
        <div class="stat">
          <span class="stat-number">{{ total_companies }}</span>
          <span class="stat-label">Companies</span>
        </div>
        <div class="stat">
          <span class="stat-number">{{ total_categories }}</span>
          <span class="stat-label">Categories</span>
        </div>
        <div class="stat">
          <span class="stat-number">{{ proven_categories }}</span>
          <span class="stat-label">Proven Impact</span>
        </div>
      </div>
    </header>

    <div class="filters">
      <div class="filter-group">
        <label class="filter-label" for="searchInput">Search:</label>
        <input type="text" class="search-input" placeholder="Search companies, tools, or technologies..." id="searchInput">
      </div>
      <div class="filter-group">
        <span class="filter-label">Impact:</span>
        <div class="filter-buttons">
          <button class="filter-btn active" data-impact="all">All</button>
          {% for filter in filters %}<button class="filter-btn" data-impact="{{ filter.key }}">{{ filter.symbol }} {{ filter.label }}</button>
          {% endfor %}
        </div>
      </div>
    </div>

    <main class="categories" id="categoriesContainer">
      {% for section in sections %}{{ section | safe }}
      {% endfor %}
    </main>

    <footer class="footer">
      <p><strong>Generated on {{ generated_on }}</strong></p>
      <p>Data-driven developer experience insights • <a href="https://github.com/nikola/awesome-devex-growth" target="_blank" rel="noopener">Contribute on GitHub</a></p>
    </footer>
  </div>

  <script>{{ script | safe }}</script>
</body>
</html>
"##;

const SOCIAL_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;900&family=JetBrains+Mono:wght@400;600;700&display=swap" rel="stylesheet">
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }

    body {
      width: {{ width }}px;
      height: {{ height }}px;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      font-family: 'Inter', sans-serif;
      color: white;
      display: flex;
      align-items: center;
      justify-content: center;
      position: relative;
      overflow: hidden;
    }

    .background-pattern {
      position: absolute;
      inset: 0;
      opacity: 0.1;
      background-image:
        radial-gradient(circle at 25% 25%, rgba(255,255,255,0.2) 2px, transparent 2px),
        radial-gradient(circle at 75% 75%, rgba(255,255,255,0.2) 2px, transparent 2px);
      background-size: 50px 50px;
    }

    .container { text-align: center; z-index: 2; max-width: 1000px; padding: 3rem; }

    .badge {
      background: rgba(255, 255, 255, 0.2);
      border: 1px solid rgba(255, 255, 255, 0.3);
      border-radius: 50px;
      padding: 0.5rem 1.5rem;
      font-size: 0.875rem;
      font-weight: 600;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      margin-bottom: 2rem;
      display: inline-block;
    }

    .title {
      font-family: 'JetBrains Mono', monospace;
      font-size: 4rem;
      font-weight: 900;
      line-height: 1.1;
      margin-bottom: 1.5rem;
      text-shadow: 2px 2px 4px rgba(0,0,0,0.3);
    }

    .subtitle {
      font-size: 1.5rem;
      opacity: 0.9;
      margin: 0 auto 3rem;
      line-height: 1.4;
      max-width: 800px;
    }

    .stats { display: flex; justify-content: center; gap: 3rem; margin-bottom: 2rem; }
    .stat { text-align: center; }

    .stat-number {
      font-family: 'JetBrains Mono', monospace;
      font-size: 3rem;
      font-weight: 700;
      line-height: 1;
      display: block;
      margin-bottom: 0.5rem;
    }

    .stat-label {
      font-size: 1rem;
      opacity: 0.8;
      text-transform: uppercase;
      letter-spacing: 0.05em;
      font-weight: 600;
    }

    .featured-companies {
      display: flex;
      justify-content: center;
      gap: 1.5rem;
      flex-wrap: wrap;
      margin-top: 2rem;
    }

    .company-logo {
      width: 60px;
      height: 60px;
      background: rgba(255, 255, 255, 0.95);
      border-radius: 12px;
      display: flex;
      align-items: center;
      justify-content: center;
      box-shadow: 0 4px 20px rgba(0,0,0,0.2);
      border: 1px solid rgba(255, 255, 255, 0.3);
    }

    .company-logo img { width: 40px; height: 40px; object-fit: contain; }

    .footer {
      position: absolute;
      bottom: 2rem;
      left: 0;
      right: 0;
      text-align: center;
      font-size: 0.875rem;
      opacity: 0.7;
    }
  </style>
</head>
<body>
  <div class="background-pattern"></div>

  <div class="container">
    <div class="badge">Developer Experience Growth</div>
    <h1 class="title">{{ heading }}</h1>
    <p class="subtitle">{{ tagline }}</p>

    <div class="stats">
      <div class="stat">
        <span class="stat-number">{{ total_companies }}</span>
        <span class="stat-label">Companies</span>
      </div>
      <div class="stat">
        <span class="stat-number">{{ total_categories }}</span>
        <span class="stat-label">Categories</span>
      </div>
      <div class="stat">
        <span class="stat-number">{{ featured | length }}</span>
        <span class="stat-label">Proven Impact</span>
      </div>
    </div>

    <div class="featured-companies">
      {% for company in featured %}<div class="company-logo">
        <img src="{{ company.logo }}" alt="{{ company.name }}" onerror="this.style.display='none'">
      </div>
      {% endfor %}
    </div>
  </div>

  <div class="footer">github.com/nikola/awesome-devex-growth</div>
</body>
</html>
"##;
