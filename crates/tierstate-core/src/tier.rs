//! # Tiers and Tier Tables
//!
//! A [`Tier`] is a named half-open interval `[lower, upper)` over the score
//! domain. A missing lower bound means −∞, a missing upper bound means +∞.
//!
//! A [`TierTable`] is an ordered list of tiers that partitions the whole
//! `i64` domain. The partition invariant is checked once, in
//! [`TierTable::new`]; a table that exists is a valid table.
//!
//! | Tier   | Interval     |
//! |--------|--------------|
//! | Low    | (−∞, 60)     |
//! | Middle | [60, 85)     |
//! | High   | [85, +∞)     |
//!
//! The table above is [`TierTable::standard`].

use crate::primitives::{
    MAX_TIER_COUNT, MAX_TIER_NAME_LENGTH, STANDARD_HIGH_FLOOR, STANDARD_MIDDLE_FLOOR,
    STANDARD_TIER_NAMES,
};
use crate::{TierError, TierId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// TIER
// =============================================================================

/// A named classification bucket covering `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tier {
    /// Tier name, unique within its table.
    pub name: String,
    /// Inclusive lower bound; `None` is −∞.
    pub lower: Option<i64>,
    /// Exclusive upper bound; `None` is +∞.
    pub upper: Option<i64>,
}

impl Tier {
    /// Create a tier with explicit (optional) bounds.
    #[must_use]
    pub fn new(name: impl Into<String>, lower: Option<i64>, upper: Option<i64>) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    /// Tier covering `[lower, upper)`.
    #[must_use]
    pub fn bounded(name: impl Into<String>, lower: i64, upper: i64) -> Self {
        Self::new(name, Some(lower), Some(upper))
    }

    /// Bottom tier covering `(−∞, upper)`.
    #[must_use]
    pub fn below(name: impl Into<String>, upper: i64) -> Self {
        Self::new(name, None, Some(upper))
    }

    /// Top tier covering `[lower, +∞)`.
    #[must_use]
    pub fn at_least(name: impl Into<String>, lower: i64) -> Self {
        Self::new(name, Some(lower), None)
    }

    /// Tier covering every score.
    #[must_use]
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    /// Check whether `score` falls inside this tier.
    #[must_use]
    pub fn contains(&self, score: i64) -> bool {
        self.lower.is_none_or(|lower| score >= lower)
            && self.upper.is_none_or(|upper| score < upper)
    }

    /// Check whether the interval contains no score at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.lower, self.upper), (Some(lower), Some(upper)) if lower >= upper)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lower {
            Some(lower) => write!(f, "{} [{}, ", self.name, lower)?,
            None => write!(f, "{} (-inf, ", self.name)?,
        }
        match self.upper {
            Some(upper) => write!(f, "{})", upper),
            None => write!(f, "+inf)"),
        }
    }
}

// =============================================================================
// TIER TABLE
// =============================================================================

/// An ordered, validated partition of the score domain.
///
/// Tiers are stored lowest first; the position of a tier is its [`TierId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Build a table, rejecting anything that is not a partition.
    ///
    /// Tiers must be given lowest first.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierError> {
        validate(&tiers)?;
        Ok(Self { tiers })
    }

    /// Build a table from tier names and the floors between them.
    ///
    /// `names.len()` must equal `floors.len() + 1`; `floors[i]` is the lower
    /// bound of `names[i + 1]`.
    pub fn from_thresholds(names: &[&str], floors: &[i64]) -> Result<Self, TierError> {
        if names.len() != floors.len().saturating_add(1) {
            return Err(TierError::ConfigError(format!(
                "{} tier names need {} thresholds, got {}",
                names.len(),
                names.len().saturating_sub(1),
                floors.len()
            )));
        }

        let tiers = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let lower = i.checked_sub(1).map(|prev| floors[prev]);
                let upper = floors.get(i).copied();
                Tier::new(*name, lower, upper)
            })
            .collect();

        Self::new(tiers)
    }

    /// The standard three-tier table: Low (−∞, 60), Middle [60, 85), High [85, +∞).
    #[must_use]
    pub fn standard() -> Self {
        let [low, middle, high] = STANDARD_TIER_NAMES;
        Self {
            tiers: vec![
                Tier::below(low, STANDARD_MIDDLE_FLOOR),
                Tier::bounded(middle, STANDARD_MIDDLE_FLOOR, STANDARD_HIGH_FLOOR),
                Tier::at_least(high, STANDARD_HIGH_FLOOR),
            ],
        }
    }

    /// Number of tiers (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false; a valid table has at least one tier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Get a tier by id.
    #[must_use]
    pub fn get(&self, id: TierId) -> Option<&Tier> {
        self.tiers.get(id.index())
    }

    /// Get a tier by id, clamping out-of-range ids to the highest tier.
    #[must_use]
    pub fn tier(&self, id: TierId) -> &Tier {
        &self.tiers[id.index().min(self.highest().index())]
    }

    /// Find the id of the tier with the given name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<TierId> {
        self.tiers.iter().position(|t| t.name == name).map(TierId)
    }

    /// Iterate tiers lowest first, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (TierId, &Tier)> {
        self.tiers.iter().enumerate().map(|(i, t)| (TierId(i), t))
    }

    /// All tiers, lowest first.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Id of the lowest tier.
    #[must_use]
    pub fn lowest(&self) -> TierId {
        TierId(0)
    }

    /// Id of the highest tier.
    #[must_use]
    pub fn highest(&self) -> TierId {
        TierId(self.tiers.len().saturating_sub(1))
    }

    /// Consume the table, returning its tiers.
    #[must_use]
    pub fn into_tiers(self) -> Vec<Tier> {
        self.tiers
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Tier>> for TierTable {
    type Error = TierError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

// =============================================================================
// PARTITION VALIDATION
// =============================================================================

/// Check that `tiers` partitions the whole `i64` domain.
fn validate(tiers: &[Tier]) -> Result<(), TierError> {
    let (first, last) = match (tiers.first(), tiers.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(TierError::EmptyTable),
    };

    if tiers.len() > MAX_TIER_COUNT {
        return Err(TierError::TooManyTiers {
            count: tiers.len(),
            max: MAX_TIER_COUNT,
        });
    }

    let mut seen = BTreeSet::new();
    for tier in tiers {
        if tier.name.trim().is_empty() || tier.name.len() > MAX_TIER_NAME_LENGTH {
            return Err(TierError::InvalidTierName(tier.name.clone()));
        }
        if !seen.insert(tier.name.as_str()) {
            return Err(TierError::DuplicateTierName(tier.name.clone()));
        }
        if tier.is_empty() {
            return Err(TierError::EmptyInterval(tier.name.clone()));
        }
    }

    if let Some(lower) = first.lower {
        return Err(TierError::UncoveredBelow {
            tier: first.name.clone(),
            lower,
        });
    }
    if let Some(upper) = last.upper {
        return Err(TierError::UncoveredAbove {
            tier: last.name.clone(),
            upper,
        });
    }

    for pair in tiers.windows(2) {
        let (below, above) = (&pair[0], &pair[1]);
        let (upper, lower) = match (below.upper, above.lower) {
            (Some(upper), Some(lower)) => (upper, lower),
            (None, _) => return Err(TierError::UnboundedInterior(below.name.clone())),
            (_, None) => return Err(TierError::UnboundedInterior(above.name.clone())),
        };

        if upper < lower {
            return Err(TierError::Gap {
                below: below.name.clone(),
                above: above.name.clone(),
                from: upper,
                to: lower,
            });
        }
        if upper > lower {
            return Err(TierError::Overlap {
                below: below.name.clone(),
                above: above.name.clone(),
                from: lower,
                to: upper,
            });
        }
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_valid() {
        let standard = TierTable::standard();
        let rebuilt = TierTable::new(standard.tiers().to_vec()).expect("valid");
        assert_eq!(standard, rebuilt);
        assert_eq!(standard.len(), 3);
    }

    #[test]
    fn contains_is_half_open() {
        let middle = Tier::bounded("Middle", 60, 85);
        assert!(!middle.contains(59));
        assert!(middle.contains(60));
        assert!(middle.contains(84));
        assert!(!middle.contains(85));
    }

    #[test]
    fn unbounded_ends_contain_extremes() {
        assert!(Tier::below("Low", 60).contains(i64::MIN));
        assert!(Tier::at_least("High", 85).contains(i64::MAX));
        assert!(Tier::unbounded("All").contains(0));
    }

    #[test]
    fn display_uses_infinity_markers() {
        assert_eq!(Tier::below("Low", 60).to_string(), "Low (-inf, 60)");
        assert_eq!(
            Tier::bounded("Middle", 60, 85).to_string(),
            "Middle [60, 85)"
        );
        assert_eq!(Tier::at_least("High", 85).to_string(), "High [85, +inf)");
    }

    #[test]
    fn single_unbounded_tier_is_valid() {
        let table = TierTable::new(vec![Tier::unbounded("Only")]).expect("valid");
        assert_eq!(table.lowest(), table.highest());
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(TierTable::new(vec![]), Err(TierError::EmptyTable)));
    }

    #[test]
    fn too_many_tiers_rejected() {
        let names: Vec<String> = (0..=MAX_TIER_COUNT).map(|i| format!("T{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let floors: Vec<i64> = (1..=MAX_TIER_COUNT as i64).map(|i| i * 10).collect();

        let result = TierTable::from_thresholds(&name_refs, &floors);
        assert!(matches!(result, Err(TierError::TooManyTiers { .. })));
    }

    #[test]
    fn gap_rejected() {
        let result = TierTable::new(vec![
            Tier::below("Low", 55),
            Tier::bounded("Middle", 60, 85),
            Tier::at_least("High", 85),
        ]);
        assert!(matches!(result, Err(TierError::Gap { from: 55, to: 60, .. })));
    }

    #[test]
    fn overlap_rejected() {
        let result = TierTable::new(vec![
            Tier::below("Low", 65),
            Tier::bounded("Middle", 60, 85),
            Tier::at_least("High", 85),
        ]);
        assert!(matches!(result, Err(TierError::Overlap { from: 60, to: 65, .. })));
    }

    #[test]
    fn floor_on_lowest_tier_rejected() {
        let result = TierTable::new(vec![
            Tier::bounded("Low", 0, 60),
            Tier::at_least("High", 60),
        ]);
        assert!(matches!(result, Err(TierError::UncoveredBelow { lower: 0, .. })));
    }

    #[test]
    fn ceiling_on_highest_tier_rejected() {
        let result = TierTable::new(vec![
            Tier::below("Low", 60),
            Tier::bounded("High", 60, 100),
        ]);
        assert!(matches!(result, Err(TierError::UncoveredAbove { upper: 100, .. })));
    }

    #[test]
    fn out_of_order_tiers_rejected() {
        let result = TierTable::new(vec![
            Tier::at_least("High", 85),
            Tier::bounded("Middle", 60, 85),
            Tier::below("Low", 60),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_interval_rejected() {
        let result = TierTable::new(vec![
            Tier::below("Low", 60),
            Tier::bounded("Middle", 60, 60),
            Tier::at_least("High", 60),
        ]);
        assert!(matches!(result, Err(TierError::EmptyInterval(name)) if name == "Middle"));
    }

    #[test]
    fn duplicate_and_blank_names_rejected() {
        let dup = TierTable::new(vec![Tier::below("A", 0), Tier::at_least("A", 0)]);
        assert!(matches!(dup, Err(TierError::DuplicateTierName(_))));

        let blank = TierTable::new(vec![Tier::below(" ", 0), Tier::at_least("B", 0)]);
        assert!(matches!(blank, Err(TierError::InvalidTierName(_))));
    }

    #[test]
    fn from_thresholds_matches_standard() {
        let table = TierTable::from_thresholds(&["Low", "Middle", "High"], &[60, 85])
            .expect("valid thresholds");
        assert_eq!(table, TierTable::standard());
    }

    #[test]
    fn from_thresholds_length_mismatch() {
        let result = TierTable::from_thresholds(&["Low", "High"], &[10, 20]);
        assert!(matches!(result, Err(TierError::ConfigError(_))));
    }

    #[test]
    fn position_and_get() {
        let table = TierTable::standard();
        let middle = table.position("Middle").expect("present");
        assert_eq!(middle, TierId(1));
        assert_eq!(table.get(middle).map(|t| t.name.as_str()), Some("Middle"));
        assert!(table.position("Missing").is_none());
    }
}
