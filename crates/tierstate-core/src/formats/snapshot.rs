//! # Snapshot Format
//!
//! Binary serialization of a context's current state: the subject's name
//! and score plus the tier table it is classified against. The active tier
//! is not stored; it is re-derived from the score on restore. No transition
//! history is recorded.
//!
//! Format: Header (5 bytes) + postcard-serialized [`ContextSnapshot`].
//! - 4 bytes: Magic ("TIER")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, and the
//! decoded tier table is re-validated before a context is rebuilt.

use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES};
use crate::{ScoreContext, Tier, TierError, TierTable};
use serde::{Deserialize, Serialize};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum accepted snapshot size in bytes.
///
/// A maximal table (16 tiers, 64-byte names) encodes well below this.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024;

/// Size of the snapshot header in bytes.
pub const HEADER_SIZE: usize = MAGIC_BYTES.len() + 1;

// =============================================================================
// HEADER
// =============================================================================

/// Split `bytes` into header and payload, checking the header on the way.
fn read_header(bytes: &[u8]) -> Result<&[u8], TierError> {
    let Some((magic, rest)) = bytes.split_first_chunk::<4>() else {
        return Err(TierError::SerializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        )));
    };
    if magic != MAGIC_BYTES {
        return Err(TierError::SerializationError(
            "Not a tier snapshot (bad magic)".to_string(),
        ));
    }

    match rest.split_first() {
        Some((&FORMAT_VERSION, payload)) => Ok(payload),
        Some((&version, _)) => Err(TierError::SerializationError(format!(
            "Unsupported snapshot version {} (expected {})",
            version, FORMAT_VERSION
        ))),
        None => Err(TierError::SerializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        ))),
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The current state of a context, detached from any live behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Subject name.
    pub name: String,
    /// Subject score.
    pub score: i64,
    /// Tier table, lowest first.
    pub tiers: Vec<Tier>,
}

impl ContextSnapshot {
    /// Re-validate the tier table and rebuild a context.
    ///
    /// The active tier is classified from the stored score; no transition is
    /// reported.
    pub fn restore(self) -> Result<ScoreContext, TierError> {
        let table = TierTable::new(self.tiers)?;
        Ok(ScoreContext::new(self.name, self.score, table))
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a snapshot to bytes (header + payload).
pub fn snapshot_to_bytes(snapshot: &ContextSnapshot) -> Result<Vec<u8>, TierError> {
    let mut bytes = MAGIC_BYTES.to_vec();
    bytes.push(FORMAT_VERSION);

    postcard::to_io(snapshot, bytes)
        .map_err(|e| TierError::SerializationError(e.to_string()))
}

/// Deserialize a snapshot from bytes.
///
/// The size cap and header are checked before the payload is decoded, and
/// the payload must be consumed exactly. The tier table itself is checked by
/// [`ContextSnapshot::restore`].
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<ContextSnapshot, TierError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(TierError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let payload = read_header(bytes)?;
    let (snapshot, trailing) = postcard::take_from_bytes(payload).map_err(|e| {
        TierError::SerializationError(format!("Failed to deserialize snapshot: {}", e))
    })?;
    if !trailing.is_empty() {
        return Err(TierError::SerializationError(format!(
            "{} unexpected bytes after snapshot payload",
            trailing.len()
        )));
    }

    Ok(snapshot)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_precedes_payload() {
        let ctx = ScoreContext::standard("h", 0);
        let bytes = snapshot_to_bytes(&ctx.snapshot()).expect("serialize");
        assert_eq!(&bytes[..4], MAGIC_BYTES);
        assert_eq!(bytes[4], FORMAT_VERSION);

        let payload = read_header(&bytes).expect("header");
        assert_eq!(payload.len(), bytes.len() - HEADER_SIZE);
    }

    #[test]
    fn header_without_version_rejected() {
        let result = read_header(MAGIC_BYTES);
        assert!(matches!(result, Err(TierError::SerializationError(msg)) if msg.contains("short")));
    }

    #[test]
    fn restore_reclassifies_from_score() {
        let mut ctx = ScoreContext::standard("one", 50);
        ctx.add_score(40);

        let bytes = snapshot_to_bytes(&ctx.snapshot()).expect("serialize");
        let restored = snapshot_from_bytes(&bytes)
            .expect("deserialize")
            .restore()
            .expect("restore");

        assert_eq!(restored.subject(), ctx.subject());
        assert_eq!(restored.current_tier_name(), "High");
        assert_eq!(restored.transition_count(), 0);
    }

    #[test]
    fn bytes_stable_across_restore() {
        let ctx = ScoreContext::standard("two", 61);
        let bytes1 = snapshot_to_bytes(&ctx.snapshot()).expect("first serialize");
        let restored = snapshot_from_bytes(&bytes1)
            .expect("deserialize")
            .restore()
            .expect("restore");
        let bytes2 = snapshot_to_bytes(&restored.snapshot()).expect("second serialize");

        assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(snapshot_from_bytes(&bytes).is_err());
    }

    #[test]
    fn wrong_version_rejected() {
        let ctx = ScoreContext::standard("v", 1);
        let mut bytes = snapshot_to_bytes(&ctx.snapshot()).expect("serialize");
        bytes[4] = FORMAT_VERSION.wrapping_add(1);

        let result = snapshot_from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(TierError::SerializationError(msg)) if msg.contains("version")
        ));
    }

    #[test]
    fn truncated_and_oversized_rejected() {
        assert!(snapshot_from_bytes(b"TIE").is_err());

        let mut oversized = MAGIC_BYTES.to_vec();
        oversized.push(FORMAT_VERSION);
        oversized.resize(MAX_SNAPSHOT_SIZE + 1, 0);
        assert!(snapshot_from_bytes(&oversized).is_err());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let ctx = ScoreContext::standard("t", 70);
        let mut bytes = snapshot_to_bytes(&ctx.snapshot()).expect("serialize");
        bytes.extend_from_slice(b"junk");

        assert!(matches!(
            snapshot_from_bytes(&bytes),
            Err(TierError::SerializationError(msg)) if msg.contains("4 unexpected bytes")
        ));
    }

    #[test]
    fn malformed_table_rejected_on_restore() {
        let snapshot = ContextSnapshot {
            name: "bad".to_string(),
            score: 10,
            tiers: vec![Tier::below("Low", 50), Tier::at_least("High", 40)],
        };
        let bytes = snapshot_to_bytes(&snapshot).expect("serialize");
        let decoded = snapshot_from_bytes(&bytes).expect("decode");

        assert!(matches!(decoded.restore(), Err(TierError::Overlap { .. })));
    }
}
