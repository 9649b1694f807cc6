//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;
use bottlenose_core::config::ENV_CONFIG;

/// Command-line interface for the bottlenose ACE web service.
///
/// Without a subcommand the HTTP server is started.
#[derive(Parser)]
#[command(name = "bottlenose")]
#[command(about = "Web API for the ACE parser and generator")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./config.json when present)
    #[arg(short, long, global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
