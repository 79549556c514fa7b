//! CLI argument parsing for BotRail

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BotRail - guardrail lifecycle and selection for chat bots
#[derive(Parser, Debug)]
#[command(name = "botrail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Provider API base URL
    ///
    /// Falls back to the BOTRAIL_ENDPOINT environment variable.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List ready guardrails and their published versions
    List {
        /// Emit the listing as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a guardrail and publish its first version
    ///
    /// The resource is created first, the version second. If only the
    /// version step fails the resource is kept; `botrail publish` retries
    /// the version step alone.
    Provision {
        /// Guardrail name
        #[arg(long)]
        name: String,

        /// Path to the policy payload (JSON)
        #[arg(long)]
        config_file: PathBuf,
    },

    /// Publish a version of an existing guardrail
    Publish {
        /// Guardrail id
        #[arg(long)]
        id: String,
    },

    /// Delete a guardrail pair, version before resource
    Teardown {
        /// Guardrail id
        #[arg(long)]
        id: String,

        /// Version id to delete
        #[arg(long)]
        version: String,
    },

    /// Show what a fresh client session would select by default
    Resolve,
}
