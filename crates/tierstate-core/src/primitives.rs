//! # Engine Primitives
//!
//! Hardcoded constants for the tier engine.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Maximum number of tiers a table may hold.
///
/// Tier tables are a small fixed set; classification stays a bounded
/// lookup over at most this many entries.
pub const MAX_TIER_COUNT: usize = 16;

/// Maximum length (bytes) of a tier name.
pub const MAX_TIER_NAME_LENGTH: usize = 64;

/// Lower bound of the Middle tier in the standard table.
///
/// Scores equal to this value are Middle, not Low.
pub const STANDARD_MIDDLE_FLOOR: i64 = 60;

/// Lower bound of the High tier in the standard table.
pub const STANDARD_HIGH_FLOOR: i64 = 85;

/// Tier names of the standard table, lowest first.
pub const STANDARD_TIER_NAMES: [&str; 3] = ["Low", "Middle", "High"];

/// Magic bytes for the snapshot format header.
pub const MAGIC_BYTES: &[u8; 4] = b"TIER";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot payload.
pub const FORMAT_VERSION: u8 = 1;
