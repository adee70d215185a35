//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ring: agents competing for neighbouring resources
//! - pipeline: producer and consumers over a dropping conduit
//! - service: one server behind a blocking waiting room
//! - all: every scenario in sequence

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Coordr - classic concurrency coordination scenarios
#[derive(Parser, Debug)]
#[command(name = "coordr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print run reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the resource ring
    Ring {
        /// Cycles each agent completes
        #[arg(short = 'n', long)]
        cycles: Option<u32>,
    },

    /// Run the bounded pipeline
    Pipeline {
        /// Failures tolerated before shutdown
        #[arg(short, long)]
        threshold: Option<u32>,
    },

    /// Run the bounded service
    Service {
        /// Customers to generate and serve
        #[arg(short = 'n', long)]
        customers: Option<usize>,
    },

    /// Run every scenario in sequence
    All,
}
