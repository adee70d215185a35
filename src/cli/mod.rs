//! CLI module for coordr - command-line interface and subcommands.
//!
//! Each subcommand runs one coordinator; with no subcommand all three run
//! in sequence.

pub mod commands;

pub use commands::Cli;
