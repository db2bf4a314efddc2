//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::load_table;
use crate::files::{output_target, read_capped};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tierstate_core::formats::MAX_SNAPSHOT_SIZE;
use tierstate_core::{
    ContextSnapshot, ScoreContext, TablePolicy, TierError, TierTable, Transition, TransitionPolicy,
    snapshot_from_bytes, snapshot_to_bytes,
};

// =============================================================================
// SNAPSHOT FILES
// =============================================================================

/// Read and decode a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<ContextSnapshot, TierError> {
    let bytes = read_capped(
        path,
        MAX_SNAPSHOT_SIZE as u64,
        TierError::SerializationError,
    )?;
    snapshot_from_bytes(&bytes)
}

/// Encode and write a context snapshot.
pub fn write_snapshot(path: &Path, ctx: &ScoreContext) -> Result<PathBuf, TierError> {
    let path = output_target(path)?;
    let bytes = snapshot_to_bytes(&ctx.snapshot())?;

    std::fs::write(&path, bytes)
        .map_err(|e| TierError::IoError(format!("Cannot write snapshot: {}", e)))?;
    Ok(path)
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn format_bound(bound: Option<i64>, infinity: &str) -> String {
    bound.map_or_else(|| infinity.to_string(), |b| b.to_string())
}

// =============================================================================
// TIERS COMMAND
// =============================================================================

/// One row of the tier listing.
#[derive(Debug, Clone, Serialize)]
pub struct TierRow {
    pub id: usize,
    pub name: String,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

/// Rows for every tier in `table`, lowest first.
pub fn tier_rows(table: &TierTable) -> Vec<TierRow> {
    table
        .iter()
        .map(|(id, tier)| TierRow {
            id: id.index(),
            name: tier.name.clone(),
            lower: tier.lower,
            upper: tier.upper,
        })
        .collect()
}

fn print_table(table: &TierTable) {
    println!(
        "{:<4} {:<16} {:>21} {:>21}",
        "ID", "TIER", "FROM (incl)", "TO (excl)"
    );
    for row in tier_rows(table) {
        println!(
            "{:<4} {:<16} {:>21} {:>21}",
            row.id,
            row.name,
            format_bound(row.lower, "-inf"),
            format_bound(row.upper, "+inf")
        );
    }
}

/// Show the active tier table.
pub fn cmd_tiers(config: Option<&Path>, json_mode: bool) -> Result<(), TierError> {
    let table = load_table(config)?;

    if json_mode {
        print_json(&serde_json::json!({ "tiers": tier_rows(&table) }));
        return Ok(());
    }

    println!("Tier Table");
    println!("==========");
    print_table(&table);

    Ok(())
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

/// Show the tier a score falls into.
pub fn cmd_classify(config: Option<&Path>, json_mode: bool, score: i64) -> Result<(), TierError> {
    let policy = TablePolicy::new(load_table(config)?);
    let id = policy.classify(score);
    let tier = policy.classify_tier(score);

    tracing::debug!(score, tier = %tier.name, "classified");

    if json_mode {
        print_json(&serde_json::json!({
            "score": score,
            "tier_id": id.index(),
            "tier": tier.name,
            "lower": tier.lower,
            "upper": tier.upper,
        }));
        return Ok(());
    }

    println!("Score {} -> {}", score, tier);
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Validate a tier table configuration.
pub fn cmd_validate(config: Option<&Path>, json_mode: bool) -> Result<(), TierError> {
    let source = config.map_or_else(|| "(standard)".to_string(), |p| p.display().to_string());
    let table = load_table(config)?;

    if json_mode {
        print_json(&serde_json::json!({
            "config": source,
            "valid": true,
            "tier_count": table.len(),
            "tiers": tier_rows(&table),
        }));
        return Ok(());
    }

    println!("Config {} is valid ({} tiers)", source, table.len());
    print_table(&table);
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Arguments of the `run` command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub name: String,
    pub initial: i64,
    pub deltas: Vec<i64>,
    pub resume: Option<PathBuf>,
    pub save: Option<PathBuf>,
}

/// Outcome of one applied delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStep {
    pub delta: i64,
    pub score: i64,
    pub tier: String,
    pub transition: Option<Transition>,
}

/// Listener that emits one structured log event per transition.
pub fn logging_listener(subject: String) -> impl FnMut(&Transition) + 'static {
    move |transition: &Transition| {
        tracing::info!(
            subject = %subject,
            from = %transition.from_name,
            to = %transition.to_name,
            score = transition.score,
            direction = %transition.direction(),
            skipped = transition.skipped(),
            "tier transition"
        );
    }
}

/// Build the context for a run: resumed from a snapshot or fresh.
pub fn build_context(
    config: Option<&Path>,
    options: &RunOptions,
) -> Result<ScoreContext, TierError> {
    match &options.resume {
        Some(path) => {
            if config.is_some() {
                tracing::warn!("--config ignored: resuming with the snapshot's tier table");
            }
            let ctx = read_snapshot(path)?.restore()?;
            tracing::info!(
                subject = %ctx.subject().name,
                score = ctx.current_score(),
                tier = %ctx.current_tier_name(),
                "resumed from snapshot"
            );
            Ok(ctx)
        }
        None => Ok(ScoreContext::new(
            options.name.clone(),
            options.initial,
            load_table(config)?,
        )),
    }
}

/// Apply `deltas` in order, recording the outcome of each.
pub fn apply_deltas(ctx: &mut ScoreContext, deltas: &[i64]) -> Vec<RunStep> {
    deltas
        .iter()
        .map(|&delta| {
            let transition = ctx.add_score(delta);
            RunStep {
                delta,
                score: ctx.current_score(),
                tier: ctx.current_tier_name().to_string(),
                transition,
            }
        })
        .collect()
}

/// Drive a context through a sequence of deltas.
pub fn cmd_run(
    config: Option<&Path>,
    json_mode: bool,
    options: RunOptions,
) -> Result<(), TierError> {
    let ctx = build_context(config, &options)?;
    let listener = logging_listener(ctx.subject().name.clone());
    let mut ctx = ctx.with_listener(listener);

    let start_score = ctx.current_score();
    let start_tier = ctx.current_tier_name().to_string();
    let steps = apply_deltas(&mut ctx, &options.deltas);

    let saved = match &options.save {
        Some(path) => Some(write_snapshot(path, &ctx)?),
        None => None,
    };

    if json_mode {
        print_json(&serde_json::json!({
            "subject": ctx.subject().name,
            "start": { "score": start_score, "tier": start_tier },
            "steps": steps,
            "final": { "score": ctx.current_score(), "tier": ctx.current_tier_name() },
            "transitions": ctx.transition_count(),
            "snapshot": saved.map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    println!("Subject: {}", ctx.subject().name);
    println!("Start:   {} [{}]", start_score, start_tier);
    println!();

    for step in &steps {
        match &step.transition {
            Some(transition) => println!(
                "  {:+} -> {} [{}]  {} -> {}",
                step.delta, step.score, step.tier, transition.from_name, transition.to_name
            ),
            None => println!("  {:+} -> {} [{}]", step.delta, step.score, step.tier),
        }
    }

    println!();
    println!(
        "Final:   {} [{}] after {} transition(s)",
        ctx.current_score(),
        ctx.current_tier_name(),
        ctx.transition_count()
    );

    if let Some(path) = saved {
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Decode a snapshot file.
pub fn cmd_inspect(path: &Path, json_mode: bool) -> Result<(), TierError> {
    let snapshot = read_snapshot(path)?;
    let ctx = snapshot.restore()?;
    let table = ctx.policy().table();

    if json_mode {
        print_json(&serde_json::json!({
            "subject": ctx.subject().name,
            "score": ctx.current_score(),
            "tier": ctx.current_tier_name(),
            "tiers": tier_rows(table),
        }));
        return Ok(());
    }

    println!("Snapshot {}", path.display());
    println!("Subject: {}", ctx.subject().name);
    println!("Score:   {}", ctx.current_score());
    println!("Tier:    {}", ctx.current_tier());
    println!();
    print_table(table);

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
