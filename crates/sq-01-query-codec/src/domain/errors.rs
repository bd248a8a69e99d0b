//! # Domain Errors
//!
//! Error types for proof decoding.

use thiserror::Error;

/// Codec error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The proof is not the canonical encoding of a `bytes[]` payload.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// The proof decoded, but to the wrong number of results.
    #[error("Result count mismatch: expected {expected}, got {got}")]
    ResultCountMismatch {
        /// Number of requests in the bundle.
        expected: usize,
        /// Number of results in the proof.
        got: usize,
    },
}
