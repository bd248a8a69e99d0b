//! # Domain Errors
//!
//! Error types for the query gateway.

use primitive_types::U256;
use shared_types::{to_hex, Address, QueryId};
use sq_01_query_codec::CodecError;
use thiserror::Error;

/// Gateway error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A bundle must contain at least one request.
    #[error("Empty query bundle")]
    EmptyBundle,

    /// The bundle exceeds the configured size cap.
    #[error("Too many requests: {count} (max {max})")]
    TooManyRequests {
        /// Requests in the bundle.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Every nonce of this gateway has been used.
    #[error("Nonce space exhausted")]
    NonceExhausted,

    /// Attached payment does not cover the fee estimate.
    #[error("Insufficient fee: required {required}, provided {provided}")]
    InsufficientFee {
        /// Fee estimate for the bundle.
        required: U256,
        /// Value attached to the call.
        provided: U256,
    },

    /// No query was issued under this identifier.
    #[error("Unknown query: {0}")]
    UnknownQuery(QueryId),

    /// The query already received its response.
    #[error("Query already fulfilled: {0}")]
    AlreadyFulfilled(QueryId),

    /// The bound light client refused the proof.
    #[error("Proof rejected at height {height}")]
    ProofRejected {
        /// Height of the request that failed verification.
        height: U256,
    },

    /// The proof does not decode to a list of results.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// The proof decoded to the wrong number of results.
    #[error("Result count mismatch: expected {expected}, got {got}")]
    ResultCountMismatch {
        /// Requests in the bundle.
        expected: usize,
        /// Results in the proof.
        got: usize,
    },

    /// No light client is registered under the bound address.
    #[error("Light client unavailable: {}", to_hex(.0))]
    LightClientUnavailable(Address),

    /// Caller is not allowed to perform this operation.
    #[error("Access denied: {}", to_hex(.0))]
    AccessDenied(Address),

    /// The results were committed but the consumer callback failed.
    #[error("Callback failed for {query_id}: {reason}")]
    CallbackFailed {
        /// Fulfilled query.
        query_id: QueryId,
        /// Reason reported by, or on behalf of, the consumer.
        reason: String,
    },
}

impl From<CodecError> for GatewayError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::ResultCountMismatch { expected, got } => {
                GatewayError::ResultCountMismatch { expected, got }
            }
            CodecError::MalformedProof(reason) => GatewayError::MalformedProof(reason),
        }
    }
}
