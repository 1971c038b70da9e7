//! # Rivet CLI Module
//!
//! This module implements the CLI interface for Rivet.
//!
//! ## Available Commands
//!
//! - `resolve` - Resolve one configuration into its instance plan
//! - `check` - Resolve every configuration in a graph and report failures
//! - `components` - List the components a graph declares

mod commands;

use clap::{Parser, Subcommand};
use rivet_core::ResolveError;
use std::path::PathBuf;

use crate::settings::Settings;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Rivet - declarative dependency injection resolver
///
/// Reads a canonical component graph and resolves configurations into
/// ordered constructor argument plans.
#[derive(Parser, Debug)]
#[command(name = "rivet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a configuration into its instance plan
    Resolve {
        /// Path to the canonical graph document
        #[arg(short, long)]
        graph: PathBuf,

        /// IRI of the configuration to resolve
        #[arg(short, long)]
        config: String,

        /// Variable value as NAME=VALUE (repeatable)
        #[arg(long = "var")]
        var: Vec<String>,

        /// Print the constructed instance tree instead of the plan
        #[arg(short, long)]
        expand: bool,
    },

    /// Resolve every configuration in a graph
    Check {
        /// Path to the canonical graph document
        #[arg(short, long)]
        graph: PathBuf,

        /// Variable value as NAME=VALUE (repeatable)
        #[arg(long = "var")]
        var: Vec<String>,
    },

    /// List the components a graph declares
    Components {
        /// Path to the canonical graph document
        #[arg(short, long)]
        graph: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Text produced by a command and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

impl Output {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<Output, ResolveError> {
    let json_mode = cli.json_mode;
    let mut settings = Settings::load(cli.settings.as_deref())?;

    match cli.command {
        Commands::Resolve {
            graph,
            config,
            var,
            expand,
        } => {
            settings.apply_overrides(&var)?;
            cmd_resolve(&graph, &config, &settings, json_mode, expand).map(Output::ok)
        }
        Commands::Check { graph, var } => {
            settings.apply_overrides(&var)?;
            let report = cmd_check(&graph, &settings)?;
            Ok(Output {
                text: report.render(json_mode)?,
                success: report.failures.is_empty(),
            })
        }
        Commands::Components { graph } => cmd_components(&graph, json_mode).map(Output::ok),
    }
}
