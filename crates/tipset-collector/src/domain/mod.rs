//! # Domain Module
//!
//! Core types for tipset collection.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
