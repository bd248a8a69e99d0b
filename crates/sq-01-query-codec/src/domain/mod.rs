//! # Domain Module
//!
//! Core types of the query codec.

pub mod envelope;
pub mod errors;

pub use envelope::*;
pub use errors::*;
