//! # Domain Errors
//!
//! Error types shared by every query consumer.

use primitive_types::U256;
use shared_types::{to_hex, Address};
use sq_02_gateway::{CallbackError, GatewayError};
use thiserror::Error;

/// Consumer error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsumerError {
    /// Caller is neither the owner nor, for callbacks, the bound gateway.
    #[error("Access denied: {}", to_hex(.0))]
    AccessDenied(Address),

    /// A proposal needs a voting period.
    #[error("The voting period cannot be 0")]
    ZeroDuration,

    /// No proposal with this id.
    #[error("Not a valid proposal id: {0}")]
    InvalidProposal(u64),

    /// The proposal stopped accepting votes.
    #[error("Proposal {0} has expired")]
    ProposalExpired(u64),

    /// Every request needs exactly one decimals entry.
    #[error("Length mismatch: {requests} requests, {decimals} decimals")]
    LengthMismatch {
        /// Requests in the bundle (or results delivered).
        requests: usize,
        /// Decimals supplied.
        decimals: usize,
    },

    /// Token decimals above 18 cannot be normalised.
    #[error("Invalid decimals: {0}")]
    InvalidDecimals(U256),

    /// The message attached to a query does not decode.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A raw result cannot be read as the expected value.
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// A callback arrived without results.
    #[error("Empty results")]
    EmptyResults,

    /// Arithmetic overflow while aggregating.
    #[error("Arithmetic overflow")]
    Overflow,

    /// The gateway refused the call.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl From<ConsumerError> for CallbackError {
    fn from(err: ConsumerError) -> Self {
        CallbackError::Rejected(err.to_string())
    }
}
