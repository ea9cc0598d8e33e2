//! # Tipset Scout Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs        # Synthetic chains + in-process HTTP node
//! │   └── integration/       # End-to-end flows over real HTTP
//! │       ├── collector_flow.rs
//! │       ├── streaming_flow.rs
//! │       └── cli_flow.rs
//! └── benches/
//!     └── collector_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p scout-tests
//!
//! # By category
//! cargo test -p scout-tests integration::collector_flow
//!
//! # Benchmarks
//! cargo bench -p scout-tests
//! ```

pub mod fixtures;
