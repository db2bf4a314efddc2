//! # Tierstate
//!
//! Library side of the tierstate binary: tier table configuration, file
//! access and the CLI commands. The engine itself lives in `tierstate-core`.

pub mod cli;
pub mod config;
pub mod files;
