//! # Core Type Definitions
//!
//! This module contains the shared types of the tier engine:
//! - The classified entity (`Subject`)
//! - Tier identity (`TierId`)
//! - The mutation capability handed to behaviors (`ScoreSink`)
//! - Error types (`TierError`)
//!
//! ## Arithmetic
//!
//! Scores are `i64`. Every mutation saturates at the `i64` bounds, so adding
//! any delta to any score is defined and never panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// TIER IDENTITY
// =============================================================================

/// Ordinal of a tier inside its table.
///
/// `TierId(0)` is the lowest tier. Ids compare in score order, so
/// `a < b` means tier `a` sits entirely below tier `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TierId(pub usize);

impl TierId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// The entity being classified: a name and an integer score.
///
/// A Subject is owned by exactly one `ScoreContext`. Behaviors only ever see
/// it through the [`ScoreSink`] capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name of the subject.
    pub name: String,
    /// Current score.
    pub score: i64,
}

impl Subject {
    /// Create a new subject.
    #[must_use]
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

// =============================================================================
// SCORE SINK (mutation capability)
// =============================================================================

/// The only view of the subject a tier behavior is given.
///
/// Exposes reading the score and applying a delta; nothing else.
pub trait ScoreSink {
    /// Current score.
    fn score(&self) -> i64;

    /// Apply `delta` (saturating) and return the new score.
    fn add_score(&mut self, delta: i64) -> i64;
}

impl ScoreSink for Subject {
    fn score(&self) -> i64 {
        self.score
    }

    fn add_score(&mut self, delta: i64) -> i64 {
        self.score = self.score.saturating_add(delta);
        self.score
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the tier engine.
///
/// Every table error is a configuration error: it surfaces when a
/// `TierTable` is built and never once a context exists. `add_score` has no
/// error path.
#[derive(Debug, Error)]
pub enum TierError {
    /// The tier table has no tiers.
    #[error("Tier table is empty")]
    EmptyTable,

    /// The tier table exceeds the fixed tier limit.
    #[error("Too many tiers: {count} (maximum {max})")]
    TooManyTiers { count: usize, max: usize },

    /// A tier name is empty or too long.
    #[error("Invalid tier name: {0:?}")]
    InvalidTierName(String),

    /// Two tiers share a name.
    #[error("Duplicate tier name: {0}")]
    DuplicateTierName(String),

    /// A tier's interval contains no score (`lower >= upper`).
    #[error("Tier {0} has an empty interval")]
    EmptyInterval(String),

    /// Scores between two adjacent tiers are not covered.
    #[error("Gap between tiers {below} and {above}: [{from}, {to}) is unclassified")]
    Gap {
        below: String,
        above: String,
        from: i64,
        to: i64,
    },

    /// Two adjacent tiers both claim some scores.
    #[error("Tiers {below} and {above} overlap on [{from}, {to})")]
    Overlap {
        below: String,
        above: String,
        from: i64,
        to: i64,
    },

    /// The lowest tier has a floor, leaving scores below it unclassified.
    #[error("Lowest tier {tier} must be unbounded below (has floor {lower})")]
    UncoveredBelow { tier: String, lower: i64 },

    /// The highest tier has a ceiling, leaving scores above it unclassified.
    #[error("Highest tier {tier} must be unbounded above (has ceiling {upper})")]
    UncoveredAbove { tier: String, upper: i64 },

    /// An interior tier is unbounded on a side that has a neighbour.
    #[error("Tier {0} is unbounded on a side that has a neighbouring tier")]
    UnboundedInterior(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A tier configuration could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
