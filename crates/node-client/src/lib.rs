//! # Node Client
//!
//! Streaming HTTP client for a ledger node's API.
//!
//! ## Purpose
//!
//! Issue calls of the form `POST {base}/api/{service}/{method}?arg=..&k=v`
//! and decode the response, which is either one JSON document or a
//! sequence of newline-delimited documents. Items are pushed to a consumer
//! one at a time; the consumer can stop the stream early.
//!
//! ## Settlement
//!
//! | Event | Outcome |
//! |-------|---------|
//! | Body ends | `Ok(StreamSummary { end: Completed, .. })` |
//! | Consumer returns `Stop` | `Ok(StreamSummary { end: Stopped, .. })` |
//! | Cancellation token fires | `Ok(StreamSummary { end: Cancelled, .. })` |
//! | Connection/status/decode failure | `Err(ClientError::..)` |
//! | Consumer returns an error | `Err(ClientError::Processor(..))` |
//!
//! Only the first terminal event counts. No default timeout is applied to
//! streams: race the call against a timer and cancel the token instead.
//!
//! ## Module Structure
//!
//! ```text
//! node-client/
//! ├── config.rs    # NodeClientConfig
//! ├── error.rs     # ClientError, ProcessorError
//! ├── query.rs     # ApiRequest, query string encoding
//! ├── framing.rs   # JSON / NDJSON body codec
//! ├── stream.rs    # Open -> Terminated lifecycle, StreamSubscription
//! └── client.rs    # StreamingApiClient, ServiceClient
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod framing;
pub mod query;
pub mod stream;

pub use client::{ServiceClient, StreamingApiClient};
pub use config::{NodeClientConfig, DEFAULT_MAX_FRAME_BYTES, DEFAULT_NODE_URL};
pub use error::{ClientError, ProcessorError};
pub use framing::{FrameError, JsonFrameDecoder};
pub use query::{encode_query, ApiRequest};
pub use stream::{
    StreamControl, StreamEnd, StreamLifecycle, StreamState, StreamSubscription, StreamSummary,
};

// Callers race streams against their own timers through this token type.
pub use tokio_util::sync::CancellationToken;
