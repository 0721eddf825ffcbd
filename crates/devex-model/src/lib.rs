//! Data model for the devex-growth directory.
//!
//! This crate owns the JSON schema of the source data file, loads and validates it,
//! and derives the aggregate statistics written next to the generated site.

pub mod directory;
pub mod loader;
pub mod stats;

pub use directory::{
    Category, Company, Directory, Framework, ImpactKey, ImpactLevel, Link, Report, Title,
};
pub use loader::{load_directory, parse_directory, ModelError, ValidationWarning};
pub use stats::{CategoryStats, ImpactBreakdown, Stats};
