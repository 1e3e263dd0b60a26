//! CLI command definitions using clap derive.
//!
//! Running `medibot` without a subcommand starts the HTTP server.

pub mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Medibot - medical question answering over a retrieval-augmented pipeline.
#[derive(Parser)]
#[command(name = "medibot", version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress everything but errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration file
    #[arg(long, global = true, env = "MEDIBOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config and environment)
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and environment)
        #[arg(long)]
        host: Option<String>,
    },

    /// Initialize the answering pipeline and print readiness as JSON
    Check,
}

impl Cli {
    /// Default tracing filter for the chosen verbosity.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "debug,hyper=info,reqwest=info",
            _ => "trace",
        }
    }
}
