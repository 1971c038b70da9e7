//! # Rivet - Declarative Dependency Injection Resolver
//!
//! The main binary for the Rivet resolution engine.
//!
//! This application provides:
//! - Resolution of a configuration into its constructor argument plan
//! - Validation of every configuration in a graph
//! - Listing of the components a graph declares
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/rivet (THE BINARY)            │
//! │                                               │
//! │  ┌─────────────┐        ┌─────────────────┐   │
//! │  │    CLI      │        │    Settings     │   │
//! │  │   (clap)    │        │     (toml)      │   │
//! │  └──────┬──────┘        └────────┬────────┘   │
//! │         └───────────┬────────────┘            │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │  rivet-core   │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! rivet resolve -g graph.json -c urn:app:main --var urn:app:port=8080
//! rivet check -g graph.json
//! rivet components -g graph.json
//! ```

use clap::Parser;
use rivet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // RIVET_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RIVET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = match (cli.verbose, cli.quiet) {
        (true, _) => "rivet=debug,rivet_core=debug",
        (false, true) => "rivet=error,rivet_core=error",
        (false, false) => "rivet=info,rivet_core=warn",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr; stdout carries command output.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    match cli::execute(cli) {
        Ok(output) => {
            println!("{}", output.text);
            if !output.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Error: {}", e);
            eprintln!("{}", e.report().render());
            std::process::exit(1);
        }
    }
}
