//! # SQ-01 Query Codec
//!
//! Pure functions for deriving query identifiers and encoding/decoding the
//! payloads that travel between consumers, the gateway and relayers.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! - Canonical Ethereum ABI encoding of the query envelope
//! - `keccak256(envelope || nonce)` query identifiers
//! - `bytes[]` result encoding for proofs
//! - Height-independent store keys and Solidity mapping slots
//!
//! ## Wire Layout
//!
//! | Item | Encoding |
//! |------|----------|
//! | Envelope | `abi.encode(address, (uint32,address,uint256,bytes32)[], bytes, address)` |
//! | Query id | `keccak256(envelope ‖ uint64 nonce)` |
//! | Store key | `keccak256(uint32 chain ‖ address ‖ bytes32 slot)` |
//! | Proof | `abi.encode(bytes[])` |
//!
//! ## Module Structure
//!
//! ```text
//! sq-01-query-codec/
//! ├── domain/          # QueryEnvelope, CodecError
//! └── algorithms/      # Solidity bindings, identifiers, results, slots
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

// Re-exports
pub use algorithms::{
    bundle_key, decode_results, decode_results_exact, derive_envelope, derive_query_id,
    encode_envelope, encode_results, encode_uint, from_sol_address, from_sol_uint, keccak256,
    mapping_slot, store_key, to_sol_address, to_sol_uint,
};
pub use domain::{CodecError, QueryEnvelope};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
