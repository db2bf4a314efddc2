//! # Tierstate
//!
//! The command-line front end for the tierstate-core engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/tierstate (THE BINARY)      │
//! │                                               │
//! │  ┌─────────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │   CLI       │  │  Config  │  │ Snapshot │  │
//! │  │  (clap)     │  │  (toml)  │  │  files   │  │
//! │  └──────┬──────┘  └────┬─────┘  └────┬─────┘  │
//! │         └──────────────┼─────────────┘        │
//! │                        ▼                      │
//! │               ┌────────────────┐              │
//! │               │ tierstate-core │              │
//! │               │  (THE ENGINE)  │              │
//! │               └────────────────┘              │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! tierstate tiers
//! tierstate classify -s 60
//! tierstate run -n one -i 50 -d 40 -d -50 -o one.tier
//! tierstate --config tiers.toml validate
//! tierstate inspect -i one.tier
//! ```

use clap::Parser;
use tierstate::cli;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // TIERSTATE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TIERSTATE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "tierstate=debug"
    } else {
        "tierstate=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!("tierstate v{}", env!("CARGO_PKG_VERSION"));
    println!();
}
