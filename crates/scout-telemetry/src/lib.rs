//! # Scout Telemetry
//!
//! Structured logging for the tipset scout tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scout_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `tipset-scout` | Service name on the root span |
//! | `SCOUT_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SCOUT_JSON_LOGS` | `false` | JSON log lines (on by default in containers) |
//! | `NO_COLOR` | unset | Disable colored console output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installing failed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Unusable configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for a tool.
///
/// Call once, early in `main`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}
