//! # Tier Table Configuration
//!
//! Loads tier tables from TOML files.
//!
//! ```toml
//! [[tiers]]
//! name = "Low"
//! upper = 60
//!
//! [[tiers]]
//! name = "Middle"
//! lower = 60
//! upper = 85
//!
//! [[tiers]]
//! name = "High"
//! lower = 85
//! ```
//!
//! A missing `lower` is −∞ and a missing `upper` is +∞. Tiers are listed
//! lowest first. Every loaded table goes through `TierTable::new`, so a
//! malformed table is rejected before any context is built.

use crate::files::read_capped;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tierstate_core::{Tier, TierError, TierTable};

/// Maximum config file size (64 KB).
///
/// A table is at most a handful of short entries.
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// One `[[tiers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierEntry {
    pub name: String,
    #[serde(default)]
    pub lower: Option<i64>,
    #[serde(default)]
    pub upper: Option<i64>,
}

impl From<TierEntry> for Tier {
    fn from(entry: TierEntry) -> Self {
        Tier::new(entry.name, entry.lower, entry.upper)
    }
}

impl From<&Tier> for TierEntry {
    fn from(tier: &Tier) -> Self {
        Self {
            name: tier.name.clone(),
            lower: tier.lower,
            upper: tier.upper,
        }
    }
}

/// A tier table as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub tiers: Vec<TierEntry>,
}

impl TierConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, TierError> {
        toml::from_str(text).map_err(|e| TierError::ConfigError(e.to_string()))
    }

    /// Validate the entries and build the table.
    pub fn into_table(self) -> Result<TierTable, TierError> {
        TierTable::new(self.tiers.into_iter().map(Tier::from).collect())
    }
}

impl From<&TierTable> for TierConfig {
    fn from(table: &TierTable) -> Self {
        Self {
            tiers: table.tiers().iter().map(TierEntry::from).collect(),
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Load the tier table from `path`, or the standard table if `None`.
pub fn load_table(path: Option<&Path>) -> Result<TierTable, TierError> {
    let Some(path) = path else {
        return Ok(TierTable::standard());
    };

    let bytes = read_capped(path, MAX_CONFIG_FILE_SIZE, TierError::ConfigError)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| TierError::ConfigError(format!("'{}': {}", path.display(), e)))?;

    TierConfig::from_toml_str(&text)?.into_table()
}

// =============================================================================
// TESTS
// =============================================================================
