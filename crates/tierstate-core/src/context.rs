//! # Score Context
//!
//! The owner of a [`Subject`] and its currently active [`TierBehavior`], and
//! the single mutation entry point for callers.
//!
//! ## Invariant
//!
//! After construction and after every [`ScoreContext::add_score`] call, the
//! active behavior's tier contains the subject's score. A call that moves the
//! score across any number of boundaries installs the final tier directly
//! and notifies the listener exactly once.
//!
//! ## Threading
//!
//! A context is a plain single-owner value. Callers sharing one across
//! threads must serialize `add_score` calls themselves.

use crate::behavior::{BehaviorFactory, DefaultBehaviors, TierBehavior};
use crate::formats::ContextSnapshot;
use crate::policy::{TablePolicy, TransitionPolicy};
use crate::{Subject, Tier, TierError, TierId, TierTable};
use serde::{Deserialize, Serialize};

// =============================================================================
// TRANSITION
// =============================================================================

/// Direction of a tier change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Moved to a higher tier.
    Promotion,
    /// Moved to a lower tier.
    Demotion,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Promotion => write!(f, "promotion"),
            Direction::Demotion => write!(f, "demotion"),
        }
    }
}

/// A change of active tier caused by one score mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Tier active before the mutation.
    pub from: TierId,
    /// Tier active after the mutation.
    pub to: TierId,
    /// Name of `from`.
    pub from_name: String,
    /// Name of `to`.
    pub to_name: String,
    /// Score after the mutation.
    pub score: i64,
}

impl Transition {
    /// Whether the subject moved up or down.
    #[must_use]
    pub fn direction(&self) -> Direction {
        if self.to > self.from {
            Direction::Promotion
        } else {
            Direction::Demotion
        }
    }

    /// Number of intermediate tiers jumped over (0 for adjacent tiers).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.from
            .index()
            .abs_diff(self.to.index())
            .saturating_sub(1)
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} (score {})",
            self.from_name, self.to_name, self.score
        )
    }
}

// =============================================================================
// LISTENER
// =============================================================================

/// Receives one call per tier transition.
pub trait TransitionListener {
    /// Called after the new tier has been installed.
    fn on_transition(&mut self, transition: &Transition);
}

impl<F> TransitionListener for F
where
    F: FnMut(&Transition),
{
    fn on_transition(&mut self, transition: &Transition) {
        self(transition);
    }
}

// =============================================================================
// SCORE CONTEXT
// =============================================================================

/// Tracks a subject's score and keeps its active tier behavior in step.
pub struct ScoreContext<P: TransitionPolicy = TablePolicy> {
    subject: Subject,
    policy: P,
    current: TierId,
    active: Box<dyn TierBehavior>,
    behaviors: Box<dyn BehaviorFactory>,
    listener: Option<Box<dyn TransitionListener>>,
    transitions: u64,
}

impl ScoreContext<TablePolicy> {
    /// Create a context classified against `table`.
    ///
    /// Infallible: a `TierTable` is already a validated partition, so every
    /// starting score has a tier.
    #[must_use]
    pub fn new(name: impl Into<String>, initial_score: i64, table: TierTable) -> Self {
        Self::with_policy(name, initial_score, TablePolicy::new(table))
    }

    /// Create a context from raw tiers, rejecting a malformed table.
    pub fn try_new(
        name: impl Into<String>,
        initial_score: i64,
        tiers: Vec<Tier>,
    ) -> Result<Self, TierError> {
        let table = TierTable::new(tiers)?;
        Ok(Self::new(name, initial_score, table))
    }

    /// Create a context over the standard Low / Middle / High table.
    #[must_use]
    pub fn standard(name: impl Into<String>, initial_score: i64) -> Self {
        Self::new(name, initial_score, TierTable::standard())
    }
}

impl<P: TransitionPolicy> ScoreContext<P> {
    /// Create a context classified by `policy`.
    #[must_use]
    pub fn with_policy(name: impl Into<String>, initial_score: i64, policy: P) -> Self {
        let subject = Subject::new(name, initial_score);
        let behaviors: Box<dyn BehaviorFactory> = Box::new(DefaultBehaviors);
        let current = policy.classify(initial_score);
        let active = bind(behaviors.as_ref(), current, policy.table().tier(current));

        Self {
            subject,
            policy,
            current,
            active,
            behaviors,
            listener: None,
            transitions: 0,
        }
    }

    /// Use `factory` to create tier behaviors from now on.
    ///
    /// The active behavior is rebuilt from the new factory for the current
    /// tier. No transition is reported.
    #[must_use]
    pub fn with_behaviors<F>(mut self, factory: F) -> Self
    where
        F: BehaviorFactory + 'static,
    {
        self.active = bind(&factory, self.current, self.current_tier());
        self.behaviors = Box::new(factory);
        self
    }

    /// Register `listener` for transition notifications.
    #[must_use]
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: TransitionListener + 'static,
    {
        self.set_listener(listener);
        self
    }

    /// Register (or replace) the transition listener.
    pub fn set_listener<L>(&mut self, listener: L)
    where
        L: TransitionListener + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the transition listener; transitions become silent.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Apply `delta` to the score and re-classify.
    ///
    /// Returns the transition if the tier changed. A change that skips tiers
    /// still yields a single transition to the final tier.
    pub fn add_score(&mut self, delta: i64) -> Option<Transition> {
        self.active.apply(&mut self.subject, delta);
        let score = self.subject.score;

        let next = self.policy.classify(score);
        if next == self.current {
            return None;
        }

        let table = self.policy.table();
        let tier = table.tier(next);
        let transition = Transition {
            from: self.current,
            to: next,
            from_name: table.tier(self.current).name.clone(),
            to_name: tier.name.clone(),
            score,
        };
        self.active = bind(self.behaviors.as_ref(), next, tier);
        self.current = next;
        self.transitions = self.transitions.saturating_add(1);

        if let Some(listener) = self.listener.as_mut() {
            listener.on_transition(&transition);
        }

        Some(transition)
    }

    /// The active tier.
    #[must_use]
    pub fn current_tier(&self) -> &Tier {
        self.policy.table().tier(self.current)
    }

    /// Id of the active tier.
    #[must_use]
    pub fn current_tier_id(&self) -> TierId {
        self.current
    }

    /// Name of the active tier.
    #[must_use]
    pub fn current_tier_name(&self) -> &str {
        &self.current_tier().name
    }

    /// Current score.
    #[must_use]
    pub fn current_score(&self) -> i64 {
        self.subject.score
    }

    /// The tracked subject.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The active tier behavior.
    #[must_use]
    pub fn active_behavior(&self) -> &dyn TierBehavior {
        self.active.as_ref()
    }

    /// The classification policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of transitions since construction.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Capture the subject and tier table.
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            name: self.subject.name.clone(),
            score: self.subject.score,
            tiers: self.policy.table().tiers().to_vec(),
        }
    }
}

/// Create the behavior for `tier` at `id`.
///
/// A behavior bound to any other tier is replaced by a `BandBehavior`.
fn bind(factory: &dyn BehaviorFactory, id: TierId, tier: &Tier) -> Box<dyn TierBehavior> {
    let behavior = factory.create(id, tier);
    if behavior.tier_id() == id && behavior.tier() == tier {
        behavior
    } else {
        DefaultBehaviors.create(id, tier)
    }
}

impl<P: TransitionPolicy> std::fmt::Debug for ScoreContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreContext")
            .field("subject", &self.subject)
            .field("current", &self.current)
            .field("active", &self.active)
            .field("transitions", &self.transitions)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BandBehavior;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(name: &str, score: i64) -> (ScoreContext, Rc<RefCell<Vec<Transition>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let ctx = ScoreContext::standard(name, score)
            .with_listener(move |t: &Transition| sink.borrow_mut().push(t.clone()));
        (ctx, seen)
    }

    #[test]
    fn initial_tier_from_score() {
        assert_eq!(ScoreContext::standard("a", 10).current_tier_name(), "Low");
        assert_eq!(ScoreContext::standard("b", 60).current_tier_name(), "Middle");
        assert_eq!(ScoreContext::standard("c", 85).current_tier_name(), "High");
    }

    #[test]
    fn construction_reports_no_transition() {
        let (ctx, seen) = recording("one", 90);
        assert_eq!(ctx.transition_count(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn promotion_two_tiers_single_notification() {
        let (mut ctx, seen) = recording("one", 50);

        let transition = ctx.add_score(40).expect("transition");
        assert_eq!(transition.from_name, "Low");
        assert_eq!(transition.to_name, "High");
        assert_eq!(transition.score, 90);
        assert_eq!(transition.direction(), Direction::Promotion);
        assert_eq!(transition.skipped(), 1);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], transition);
        assert_eq!(ctx.current_tier_name(), "High");
    }

    #[test]
    fn demotion_two_tiers_single_notification() {
        let (mut ctx, seen) = recording("one", 90);

        let transition = ctx.add_score(-50).expect("transition");
        assert_eq!(
            (transition.from_name.as_str(), transition.to_name.as_str()),
            ("High", "Low")
        );
        assert_eq!(transition.score, 40);
        assert_eq!(transition.direction(), Direction::Demotion);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn move_within_tier_is_silent() {
        let (mut ctx, seen) = recording("one", 70);

        assert!(ctx.add_score(5).is_none());
        assert_eq!(ctx.current_score(), 75);
        assert_eq!(ctx.current_tier_name(), "Middle");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn zero_delta_is_silent() {
        let (mut ctx, seen) = recording("one", 60);
        assert!(ctx.add_score(0).is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn adjacent_transition_skips_nothing() {
        let mut ctx = ScoreContext::standard("one", 80);
        let transition = ctx.add_score(10).expect("transition");
        assert_eq!(transition.to_name, "High");
        assert_eq!(transition.skipped(), 0);
    }

    #[test]
    fn high_tier_gets_high_behavior() {
        let mut ctx = ScoreContext::standard("one", 80);
        ctx.add_score(10);

        let behavior = ctx.active_behavior();
        assert_eq!(behavior.name(), "High");
        assert_eq!(behavior.tier_id(), TierId(2));
        assert_eq!(ctx.current_tier().lower, Some(85));
    }

    #[test]
    fn no_listener_still_transitions() {
        let mut ctx = ScoreContext::standard("quiet", 10);
        assert!(ctx.add_score(100).is_some());
        assert_eq!(ctx.current_tier_name(), "High");
        assert_eq!(ctx.transition_count(), 1);
    }

    #[test]
    fn clear_listener_silences_notifications() {
        let (mut ctx, seen) = recording("one", 10);
        ctx.add_score(60);
        ctx.clear_listener();
        ctx.add_score(-60);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(ctx.transition_count(), 2);
    }

    #[test]
    fn saturating_score_stays_classified() {
        let mut ctx = ScoreContext::standard("edge", 0);
        ctx.add_score(i64::MAX);
        ctx.add_score(i64::MAX);
        assert_eq!(ctx.current_score(), i64::MAX);
        assert_eq!(ctx.current_tier_name(), "High");

        ctx.add_score(i64::MIN);
        ctx.add_score(i64::MIN);
        assert_eq!(ctx.current_score(), i64::MIN);
        assert_eq!(ctx.current_tier_name(), "Low");
    }

    #[test]
    fn try_new_rejects_gap() {
        let result = ScoreContext::try_new(
            "bad",
            50,
            vec![Tier::below("Low", 50), Tier::at_least("High", 60)],
        );
        assert!(matches!(result, Err(TierError::Gap { .. })));
    }

    #[test]
    fn custom_factory_builds_every_active_behavior() {
        let created = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&created);
        let factory = move |id: TierId, tier: &Tier| -> Box<dyn TierBehavior> {
            log.borrow_mut().push(tier.name.clone());
            Box::new(BandBehavior::new(id, tier.clone()))
        };

        let mut ctx = ScoreContext::standard("one", 70).with_behaviors(factory);
        ctx.add_score(20);
        ctx.add_score(-80);

        assert_eq!(*created.borrow(), vec!["Middle", "High", "Low"]);
    }

    #[test]
    fn mislabelled_behavior_replaced_by_default() {
        let middle = TierTable::standard().tier(TierId(1)).clone();
        let mislabelled = move |id: TierId, tier: &Tier| -> Box<dyn TierBehavior> {
            if id == TierId(2) {
                Box::new(BandBehavior::new(TierId(1), middle.clone()))
            } else {
                Box::new(BandBehavior::new(id, tier.clone()))
            }
        };
        let (ctx, seen) = recording("one", 80);
        let mut ctx = ctx.with_behaviors(mislabelled);

        let transition = ctx.add_score(10).expect("transition");
        assert_eq!(transition.to_name, "High");
        assert_eq!(ctx.current_tier_name(), "High");
        assert_eq!(ctx.active_behavior().tier_id(), TierId(2));
        assert!(ctx.current_tier().contains(ctx.current_score()));

        assert!(ctx.add_score(1).is_none());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(ctx.transition_count(), 1);
    }

    #[test]
    fn behavior_may_adjust_delta() {
        /// Halves every gain while in its tier.
        #[derive(Debug)]
        struct Damped(BandBehavior);

        impl TierBehavior for Damped {
            fn tier_id(&self) -> TierId {
                self.0.tier_id()
            }

            fn tier(&self) -> &Tier {
                self.0.tier()
            }

            fn apply(&self, sink: &mut dyn crate::ScoreSink, delta: i64) -> i64 {
                sink.add_score(if delta > 0 { delta / 2 } else { delta })
            }
        }

        let mut ctx = ScoreContext::standard("one", 50).with_behaviors(
            |id: TierId, tier: &Tier| -> Box<dyn TierBehavior> {
                Box::new(Damped(BandBehavior::new(id, tier.clone())))
            },
        );

        let transition = ctx.add_score(40).expect("transition");
        assert_eq!(ctx.current_score(), 70);
        assert_eq!(transition.to_name, "Middle");
        assert!(ctx.current_tier().contains(ctx.current_score()));
    }

    #[test]
    fn snapshot_captures_state() {
        let mut ctx = ScoreContext::standard("one", 50);
        ctx.add_score(12);

        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.name, "one");
        assert_eq!(snapshot.score, 62);
        assert_eq!(snapshot.tiers, TierTable::standard().into_tiers());
    }
}
