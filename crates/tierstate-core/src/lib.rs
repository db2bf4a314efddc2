//! # tierstate-core
//!
//! The tiered score-classification engine - THE ENGINE.
//!
//! A [`ScoreContext`] owns a [`Subject`] (a name and an integer score) and
//! exactly one active [`TierBehavior`]. Every score mutation goes through
//! [`ScoreContext::add_score`], which re-classifies the new score from scratch
//! through a [`TransitionPolicy`] and swaps the active behavior whenever the
//! score lands in a different tier, including jumps that skip tiers.
//!
//! ## Architectural Constraints
//!
//! - The tier table is a validated partition of the whole `i64` domain:
//!   no gaps, no overlaps, unbounded at both ends
//! - Classification lives in the policy only; behaviors never check bounds
//! - After every mutation, the active tier contains the current score
//! - Has NO async, NO I/O, NO logging dependencies (pure Rust)
//!
//! ## Example
//!
//! ```
//! use tierstate_core::{ScoreContext, TierTable};
//!
//! let mut ctx = ScoreContext::new("one", 50, TierTable::standard());
//! assert_eq!(ctx.current_tier_name(), "Low");
//!
//! let transition = ctx.add_score(40).expect("crosses two boundaries");
//! assert_eq!(transition.from_name, "Low");
//! assert_eq!(transition.to_name, "High");
//! assert_eq!(ctx.current_score(), 90);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod behavior;
pub mod context;
pub mod formats;
pub mod policy;
pub mod primitives;
pub mod tier;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{ScoreSink, Subject, TierError, TierId};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use behavior::{BandBehavior, BehaviorFactory, DefaultBehaviors, TierBehavior};
pub use context::{Direction, ScoreContext, Transition, TransitionListener};
pub use policy::{TablePolicy, TransitionPolicy};
pub use tier::{Tier, TierTable};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{ContextSnapshot, snapshot_from_bytes, snapshot_to_bytes};
