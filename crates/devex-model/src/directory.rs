//! Schema types for the directory data file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The whole loaded data file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Directory {
    /// Page heading and subtitle
    pub title: Title,

    /// Free-form descriptive fields
    #[serde(default)]
    pub metadata: Metadata,

    /// Display records keyed by impact key
    #[serde(default)]
    pub impact_levels: BTreeMap<String, ImpactLevel>,

    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Business impact research (README only)
    #[serde(default)]
    pub research_links: Vec<Link>,

    /// Developer productivity studies (README only)
    #[serde(default)]
    pub case_studies: Vec<Link>,

    /// DevEx frameworks (README only)
    #[serde(default)]
    pub frameworks: Vec<Framework>,

    /// Industry reports (README only)
    #[serde(default)]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub heading: String,
    #[serde(default)]
    pub subtitle: String,
}

/// Descriptive metadata. Unknown fields are kept so `/api/data`-style consumers
/// of a re-serialized model lose nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Display record for one impact level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImpactLevel {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A named, ordered group of companies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Anchor id, unique across the directory
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub companies: Vec<Company>,
}

/// A single directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub name: String,
    pub link: String,

    /// File path relative to the asset base directory, a URL, or (after
    /// inlining) a data URI
    #[serde(default)]
    pub logo: String,

    /// Key into `Directory::impact_levels`
    pub impact: String,

    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub evidence_link: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub why_awesome: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Framework {
    pub name: String,
    #[serde(default)]
    pub source: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub name: String,
    pub url: String,
}

/// The closed set of impact keys the generators know how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImpactKey {
    Proven,
    Measured,
    Favorite,
}

impl ImpactKey {
    /// All known keys in display order.
    pub const ALL: [ImpactKey; 3] = [ImpactKey::Proven, ImpactKey::Measured, ImpactKey::Favorite];

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactKey::Proven => "proven",
            ImpactKey::Measured => "measured",
            ImpactKey::Favorite => "favorite",
        }
    }

    /// Label used on the HTML filter buttons.
    pub fn filter_label(self) -> &'static str {
        match self {
            ImpactKey::Proven => "Proven",
            ImpactKey::Measured => "Measured",
            ImpactKey::Favorite => "Community",
        }
    }

    /// Parenthetical used in the README search tips.
    pub fn tip_label(self) -> &'static str {
        match self {
            ImpactKey::Proven => "proven",
            ImpactKey::Measured => "measured",
            ImpactKey::Favorite => "community favorite",
        }
    }
}

impl fmt::Display for ImpactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Directory {
    /// Iterate over every company across all categories, in display order.
    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.categories.iter().flat_map(|c| c.companies.iter())
    }

    /// Sum of company-list lengths across all categories.
    pub fn total_companies(&self) -> usize {
        self.categories.iter().map(|c| c.companies.len()).sum()
    }

    /// Number of companies whose impact key equals `key`.
    pub fn count_impact(&self, key: ImpactKey) -> usize {
        self.companies().filter(|c| c.has_impact(key)).count()
    }

    /// Number of categories containing at least one company with `key`.
    pub fn categories_with_impact(&self, key: ImpactKey) -> usize {
        self.categories
            .iter()
            .filter(|cat| cat.companies.iter().any(|c| c.has_impact(key)))
            .count()
    }

    /// Look up the display record for an impact key.
    pub fn impact_level(&self, key: &str) -> Option<&ImpactLevel> {
        self.impact_levels.get(key)
    }

    /// Display symbol for an impact key, empty when the key is unknown.
    pub fn impact_symbol(&self, key: &str) -> &str {
        self.impact_level(key)
            .map(|level| level.symbol.as_str())
            .unwrap_or("")
    }
}

impl Company {
    pub fn has_impact(&self, key: ImpactKey) -> bool {
        self.impact == key.as_str()
    }
}
