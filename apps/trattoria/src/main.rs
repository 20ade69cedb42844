//! # Trattoria
//!
//! The main binary for the Trattoria restaurant model.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          apps/trattoria (THE BINARY)          │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │        │    Config      │   │
//! │   │   (clap)    │        │ (toml + env)   │   │
//! │   └──────┬──────┘        └───────┬────────┘   │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │             ┌────────────────┐                │
//! │             │ trattoria-core │                │
//! │             │  (THE LOGIC)   │                │
//! │             └────────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! trattoria init
//! trattoria seed
//! trattoria menu
//! trattoria verify --json-mode
//! trattoria unlink-ingredient --item 7 --ingredient 2
//! ```

use clap::Parser;
use trattoria::cli;
use trattoria::config::{AppConfig, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    let config = match AppConfig::resolve(cli.data.clone(), cli.config.as_deref(), |key| {
        std::env::var(key).ok()
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(config.log_format, cli.verbose);

    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat, verbose: bool) {
    let default_filter = if verbose {
        "trattoria=debug,trattoria_core=debug"
    } else {
        "trattoria=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
