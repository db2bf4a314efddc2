//! # Transition Policy
//!
//! The single place where a score is mapped to a tier.
//!
//! Classification is always computed from scratch for the final score, never
//! as "is the adjacent tier reached?". A delta that crosses several
//! boundaries in one call lands directly on the tier implied by the result.

use crate::{Tier, TierId, TierTable};

// =============================================================================
// POLICY TRAIT
// =============================================================================

/// Maps a score to the id of the tier that contains it.
///
/// Implementations must be deterministic and total over `i64`, and must
/// return an id that is valid for [`TransitionPolicy::table`].
pub trait TransitionPolicy {
    /// The tier table this policy classifies against.
    fn table(&self) -> &TierTable;

    /// Id of the unique tier containing `score`.
    fn classify(&self, score: i64) -> TierId;

    /// The tier containing `score`.
    fn classify_tier(&self, score: i64) -> &Tier {
        self.table().tier(self.classify(score))
    }
}

// =============================================================================
// TABLE POLICY
// =============================================================================

/// Bounds lookup over a validated [`TierTable`].
///
/// Binary search on upper bounds: the answer is the first tier whose upper
/// bound lies above the score. The table's partition invariant guarantees
/// that tier also contains the score.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePolicy {
    table: TierTable,
}

impl TablePolicy {
    /// Create a policy over `table`.
    #[must_use]
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    /// Consume the policy, returning its table.
    #[must_use]
    pub fn into_table(self) -> TierTable {
        self.table
    }
}

impl From<TierTable> for TablePolicy {
    fn from(table: TierTable) -> Self {
        Self::new(table)
    }
}

impl TransitionPolicy for TablePolicy {
    fn table(&self) -> &TierTable {
        &self.table
    }

    fn classify(&self, score: i64) -> TierId {
        let index = self
            .table
            .tiers()
            .partition_point(|tier| tier.upper.is_some_and(|upper| upper <= score));
        // The highest tier is unbounded above, so the index is always in range.
        TierId(index.min(self.table.highest().index()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
