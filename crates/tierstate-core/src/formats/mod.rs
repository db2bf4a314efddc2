//! # Formats Module
//!
//! Binary snapshot encoding for score contexts.
//!
//! File I/O lives in the app layer; everything here is a pure
//! bytes-in / bytes-out transformation.

mod snapshot;

pub use snapshot::*;
