//! # Tier Behaviors
//!
//! A tier behavior is "what happens while the subject sits in this tier".
//! It is bound to one tier's identity and interval and forwards mutation
//! requests to the subject through the [`ScoreSink`] capability.
//!
//! Behaviors perform no classification. They never look at tier bounds to
//! decide where the subject goes next; that is the
//! [`TransitionPolicy`](crate::TransitionPolicy)'s job alone.
//!
//! A behavior is created by a [`BehaviorFactory`] when its tier becomes
//! active and dropped as soon as another tier takes over.

use crate::{ScoreSink, Tier, TierId};
use std::fmt;

// =============================================================================
// BEHAVIOR TRAIT
// =============================================================================

/// The active behavior of a classified subject.
pub trait TierBehavior: fmt::Debug {
    /// Id of the tier this behavior is bound to.
    fn tier_id(&self) -> TierId;

    /// The tier this behavior is bound to.
    fn tier(&self) -> &Tier;

    /// Apply a score change through the subject's mutation capability.
    ///
    /// Returns the new score. The default forwards `delta` unchanged.
    fn apply(&self, sink: &mut dyn ScoreSink, delta: i64) -> i64 {
        sink.add_score(delta)
    }

    /// Name of the bound tier.
    fn name(&self) -> &str {
        &self.tier().name
    }
}

// =============================================================================
// BAND BEHAVIOR
// =============================================================================

/// Default behavior: binds a tier and forwards every delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandBehavior {
    id: TierId,
    tier: Tier,
}

impl BandBehavior {
    /// Bind a behavior to `tier`, which sits at `id` in its table.
    #[must_use]
    pub fn new(id: TierId, tier: Tier) -> Self {
        Self { id, tier }
    }
}

impl TierBehavior for BandBehavior {
    fn tier_id(&self) -> TierId {
        self.id
    }

    fn tier(&self) -> &Tier {
        &self.tier
    }
}

// =============================================================================
// BEHAVIOR FACTORY
// =============================================================================

/// Creates the behavior for a tier that has just become active.
///
/// The returned behavior must be bound to exactly the requested tier. A
/// context replaces one bound elsewhere with a [`BandBehavior`].
pub trait BehaviorFactory {
    /// Create the behavior for `tier`, which sits at `id` in its table.
    fn create(&self, id: TierId, tier: &Tier) -> Box<dyn TierBehavior>;
}

/// Factory producing a [`BandBehavior`] for every tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBehaviors;

impl BehaviorFactory for DefaultBehaviors {
    fn create(&self, id: TierId, tier: &Tier) -> Box<dyn TierBehavior> {
        Box::new(BandBehavior::new(id, tier.clone()))
    }
}

impl<F> BehaviorFactory for F
where
    F: Fn(TierId, &Tier) -> Box<dyn TierBehavior>,
{
    fn create(&self, id: TierId, tier: &Tier) -> Box<dyn TierBehavior> {
        self(id, tier)
    }
}

// =============================================================================
// TESTS
// =============================================================================
