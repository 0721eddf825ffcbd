//! Loading and validating the directory data file.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::directory::{Directory, ImpactKey};

/// Errors that can occur when loading the data file.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid directory JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),
}

/// A problem in the data that rendering tolerates but an editor should fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A company references an impact key with no display record
    UnknownImpact { company: String, impact: String },

    /// One of the known impact keys has no display record
    MissingImpactLevel(ImpactKey),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnknownImpact { company, impact } => write!(
                f,
                "company '{}' uses impact '{}' which is not in impact_levels",
                company, impact
            ),
            ValidationWarning::MissingImpactLevel(key) => {
                write!(f, "impact_levels has no entry for '{}'", key)
            }
        }
    }
}

/// Read, parse and validate the data file at `path`.
///
/// Validation warnings are logged; hard validation failures are returned as errors.
pub fn load_directory(path: impl AsRef<Path>) -> Result<Directory, ModelError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| ModelError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let directory = parse_directory(&source)?;

    for warning in directory.validate()? {
        tracing::warn!("{}: {}", path.display(), warning);
    }

    tracing::debug!(
        "Loaded {} categories with {} companies from {}",
        directory.categories.len(),
        directory.total_companies(),
        path.display()
    );

    Ok(directory)
}

/// Parse a directory from JSON source without validating it.
pub fn parse_directory(source: &str) -> Result<Directory, ModelError> {
    serde_json::from_str(source).map_err(|e| ModelError::Parse {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

impl Directory {
    /// Check structural invariants the schema cannot express.
    ///
    /// Category ids must be unique since they become HTML ids and README anchors.
    pub fn validate(&self) -> Result<Vec<ValidationWarning>, ModelError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(ModelError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut warnings: Vec<ValidationWarning> = ImpactKey::ALL
            .iter()
            .filter(|key| !self.impact_levels.contains_key(key.as_str()))
            .map(|key| ValidationWarning::MissingImpactLevel(*key))
            .collect();

        warnings.extend(
            self.companies()
                .filter(|c| !self.impact_levels.contains_key(&c.impact))
                .map(|c| ValidationWarning::UnknownImpact {
                    company: c.name.clone(),
                    impact: c.impact.clone(),
                }),
        );

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"{
        "title": { "heading": "Awesome DevEx Growth", "subtitle": "Tools that grow" },
        "metadata": { "description": "A list", "version": "1.0" },
        "impact_levels": {
            "proven": { "symbol": "🏆", "name": "Proven", "description": "Measured growth" },
            "measured": { "symbol": "📈", "name": "Measured", "description": "Some data" },
            "favorite": { "symbol": "⭐", "name": "Favorite", "description": "Loved" }
        },
        "categories": [
            {
                "id": "apis",
                "name": "APIs",
                "description": "API-first companies",
                "companies": [
                    {
                        "name": "Stripe",
                        "link": "https://stripe.com",
                        "logo": "logos/stripe.png",
                        "impact": "proven",
                        "evidence": "Docs drive signups",
                        "evidence_link": "https://stripe.com/blog",
                        "key_features": ["Great docs"],
                        "why_awesome": "Seven lines of code",
                        "description": "Payments",
                        "tags": ["payments", "api"]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_minimal_directory() {
        let dir = parse_directory(MINIMAL).unwrap();

        assert_eq!(dir.title.heading, "Awesome DevEx Growth");
        assert_eq!(dir.metadata.description, "A list");
        assert_eq!(dir.metadata.extra.get("version").unwrap(), "1.0");
        assert_eq!(dir.categories.len(), 1);
        assert_eq!(dir.categories[0].companies[0].tags, vec!["payments", "api"]);
        assert!(dir.research_links.is_empty());
        assert!(dir.validate().unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_required_field() {
        let source = r#"{
            "title": { "heading": "X" },
            "categories": [
                { "id": "a", "name": "A", "companies": [ { "name": "NoLink", "impact": "proven" } ] }
            ]
        }"#;

        let err = parse_directory(source).unwrap_err();

        assert!(matches!(err, ModelError::Parse { .. }));
        assert!(err.to_string().contains("link"));
    }

    #[test]
    fn rejects_truncated_json() {
        let truncated = &MINIMAL[..MINIMAL.len() / 2];

        assert!(matches!(
            parse_directory(truncated),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_category_ids() {
        let source = r#"{
            "title": { "heading": "X" },
            "categories": [
                { "id": "a", "name": "A" },
                { "id": "a", "name": "Again" }
            ]
        }"#;

        let dir = parse_directory(source).unwrap();

        assert!(matches!(
            dir.validate(),
            Err(ModelError::DuplicateCategory(id)) if id == "a"
        ));
    }

    #[test]
    fn warns_about_unknown_impact() {
        let source = MINIMAL.replace(r#""impact": "proven""#, r#""impact": "legendary""#);
        let dir = parse_directory(&source).unwrap();

        let warnings = dir.validate().unwrap();

        assert_eq!(
            warnings,
            vec![ValidationWarning::UnknownImpact {
                company: "Stripe".to_string(),
                impact: "legendary".to_string(),
            }]
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempdir().unwrap();

        let err = load_directory(temp.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, ModelError::Read { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("devex-growth.json");
        fs::write(&path, MINIMAL).unwrap();

        let dir = load_directory(&path).unwrap();

        assert_eq!(dir.total_companies(), 1);
    }
}
