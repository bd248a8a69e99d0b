//! # Shared Types Crate
//!
//! Types shared by the codec, the gateway and every query consumer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: requests, responses and identifiers are
//!   defined once and reused by every subsystem.
//! - **Caller identity travels in the context**: operations receive a
//!   [`CallContext`] instead of embedding `sender` fields in payloads.

pub mod context;
pub mod entities;
pub mod errors;

pub use context::CallContext;
pub use entities::*;
pub use errors::*;
