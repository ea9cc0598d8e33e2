//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Tipset Scout: recent, height-stable tipsets from a ledger node
#[derive(Parser, Debug)]
#[command(name = "tipset-scout", version)]
#[command(about = "Collect recent, height-stable tipsets from a ledger node")]
pub struct Args {
    /// Node API base URL (requests go to {node}/api/...)
    #[arg(short, long, env = "SCOUT_NODE_URL")]
    pub node: Option<String>,

    /// JSON config file with `node` and `collector` sections
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Walk back from the current heads and print the stable batch
    Collect {
        /// Ignore tipsets at or below this height
        #[arg(long, default_value_t = 0)]
        floor: u64,

        /// Parent discoveries after which the walk stops
        #[arg(long)]
        discovery_bound: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print the node's current chain heads
    Heads,

    /// Fetch and print a single tipset
    Block {
        /// Tipset identifier
        cid: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Stream any API method and print each item as one JSON line
    Stream {
        /// Service segment, e.g. `chain`
        service: String,

        /// Method segment, e.g. `ls`
        method: String,

        /// Positional arguments, sent as repeated `arg=`
        args: Vec<String>,

        /// Extra query options as key=value
        #[arg(long = "opt", value_parser = parse_key_val)]
        options: Vec<(String, String)>,

        /// Stop after this many items
        #[arg(long)]
        limit: Option<usize>,

        /// Cancel the stream after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

/// Parse `key=value`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got {:?}", s)),
    }
}
