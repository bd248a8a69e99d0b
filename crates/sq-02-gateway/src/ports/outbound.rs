//! # Outbound Ports
//!
//! Traits for the gateway's collaborators: light clients, fee estimation and
//! consumer callbacks.

use async_trait::async_trait;
use parking_lot::Mutex;
use primitive_types::U256;
use shared_types::{Bytes, CallContext, QueryId, QueryRequest};
use thiserror::Error;

/// Light client - outbound port.
///
/// Verifies that a proof is valid for source-chain state at `height`.
#[async_trait]
pub trait LightClient: Send + Sync {
    /// `true` if the proof is accepted at `height`.
    async fn verify(&self, height: U256, proof: &[u8]) -> bool;
}

/// Fee estimator - outbound port.
pub trait FeeEstimator: Send + Sync {
    /// Fee required for a bundle of `request_count` requests.
    fn estimate_fee(&self, request_count: usize) -> U256;
}

/// Error reported by a consumer callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// The consumer refused the result.
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Consumer callback - outbound port.
///
/// The gateway invokes it once per fulfilled query, after the results are
/// committed.
#[async_trait]
pub trait QueryCallback: Send + Sync {
    /// Deliver the verified results of `query_id`.
    ///
    /// `ctx.sender` is the gateway address; `requests` is the original bundle
    /// and `message` the payload attached at issue time.
    async fn on_query_result(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<(), CallbackError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// One recorded callback invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackInvocation {
    /// Context the gateway passed.
    pub ctx: CallContext,
    /// Fulfilled query.
    pub query_id: QueryId,
    /// Delivered results.
    pub results: Vec<Bytes>,
    /// Original bundle.
    pub requests: Vec<QueryRequest>,
    /// Original message.
    pub message: Bytes,
}

/// Mock callback that records invocations.
#[derive(Default)]
pub struct MockCallback {
    /// Recorded invocations.
    pub calls: Mutex<Vec<CallbackInvocation>>,
    /// Should fail?
    pub should_fail: bool,
}

impl MockCallback {
    /// A callback that always fails.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl QueryCallback for MockCallback {
    async fn on_query_result(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<(), CallbackError> {
        self.calls.lock().push(CallbackInvocation {
            ctx: *ctx,
            query_id,
            results,
            requests,
            message,
        });
        if self.should_fail {
            return Err(CallbackError::Rejected("mock failure".to_string()));
        }
        Ok(())
    }
}
