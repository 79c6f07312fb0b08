//! # vsgraph CLI Module
//!
//! This module implements the CLI interface for vsgraph.
//!
//! ## Available Commands
//!
//! - `run` - Activate a graph file and drive it for a number of ticks
//! - `validate` - Activate a graph file without ticking it
//! - `inspect` - Show the topology summary and fan-out of a graph file
//! - `kinds` - List the built-in node kinds

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vsgraph_core::GraphError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// vsgraph - visual-scripting graph host
///
/// Loads a graph description, activates it on the execution engine and
/// drives it one host tick at a time.
#[derive(Parser, Debug)]
#[command(name = "vsgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activate a graph and drive it tick by tick
    Run {
        /// Path to the graph file (TOML)
        #[arg(short, long)]
        graph: PathBuf,

        /// Number of host ticks to run
        #[arg(short, long, default_value = "1")]
        ticks: usize,

        /// Stop early once the graph is quiescent and no injection remains
        #[arg(long)]
        until_quiescent: bool,
    },

    /// Check that a graph activates cleanly
    Validate {
        /// Path to the graph file (TOML)
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Show topology metrics and fan-out
    Inspect {
        /// Path to the graph file (TOML)
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// List built-in node kinds
    Kinds,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), GraphError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run {
            graph,
            ticks,
            until_quiescent,
        }) => cmd_run(&graph, ticks, until_quiescent, json_mode, cli.verbose),
        Some(Commands::Validate { graph }) => cmd_validate(&graph, json_mode),
        Some(Commands::Inspect { graph }) => cmd_inspect(&graph, json_mode),
        Some(Commands::Kinds) | None => cmd_kinds(json_mode),
    }
}
