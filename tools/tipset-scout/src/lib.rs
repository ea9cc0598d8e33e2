//! Tipset Scout: command line front end for the tipset collector.
//!
//! Prints collected tipsets, chain heads, single tipsets or any streamed
//! API method as JSON on stdout. Logs go to stderr.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{Args, Command};
pub use config::ScoutConfig;
pub use output::OutputFormat;
