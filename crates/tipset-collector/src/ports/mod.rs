//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API, outbound dependencies).

pub mod decoders;
pub mod inbound;
pub mod outbound;

pub use decoders::*;
pub use inbound::*;
pub use outbound::*;
