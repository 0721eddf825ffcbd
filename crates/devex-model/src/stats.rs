//! Aggregate statistics written alongside the generated HTML.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::{Directory, ImpactKey};

/// Summary of a directory at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    /// RFC 3339 timestamp with millisecond precision
    pub generated_at: String,
    pub total_companies: usize,
    pub total_categories: usize,
    pub impact_breakdown: ImpactBreakdown,
    pub categories: Vec<CategoryStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImpactBreakdown {
    pub proven: usize,
    pub measured: usize,
    pub favorite: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryStats {
    pub name: String,
    pub id: String,
    pub company_count: usize,
}

impl Stats {
    /// Compute statistics for `directory` stamped with `generated_at`.
    pub fn compute(directory: &Directory, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_companies: directory.total_companies(),
            total_categories: directory.categories.len(),
            impact_breakdown: ImpactBreakdown {
                proven: directory.count_impact(ImpactKey::Proven),
                measured: directory.count_impact(ImpactKey::Measured),
                favorite: directory.count_impact(ImpactKey::Favorite),
            },
            categories: directory
                .categories
                .iter()
                .map(|cat| CategoryStats {
                    name: cat.name.clone(),
                    id: cat.id.clone(),
                    company_count: cat.companies.len(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
