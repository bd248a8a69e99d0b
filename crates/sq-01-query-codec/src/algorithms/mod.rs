//! # Algorithms Module
//!
//! Encoding, hashing and decoding routines. All functions are pure.

pub mod bindings;
pub mod query_id;
pub mod results;
pub mod slots;

pub use bindings::{encode_uint, from_sol_address, from_sol_uint, to_sol_address, to_sol_uint};
pub use query_id::{
    bundle_key, derive_envelope, derive_query_id, encode_envelope, keccak256, store_key,
};
pub use results::{decode_results, decode_results_exact, encode_results};
pub use slots::mapping_slot;
