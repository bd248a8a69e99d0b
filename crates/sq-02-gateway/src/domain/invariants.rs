//! # Domain Invariants
//!
//! Business rules checked before the gateway touches its state.

use super::errors::GatewayError;
use super::value_objects::QueryStatus;
use primitive_types::U256;
use shared_types::{Address, QueryId};

/// Invariant: a bundle holds at least one request.
pub fn invariant_non_empty_bundle(count: usize) -> Result<(), GatewayError> {
    if count == 0 {
        return Err(GatewayError::EmptyBundle);
    }
    Ok(())
}

/// Invariant: a bundle stays under the configured cap.
pub fn invariant_bundle_size(count: usize, max: usize) -> Result<(), GatewayError> {
    if count > max {
        return Err(GatewayError::TooManyRequests { count, max });
    }
    Ok(())
}

/// Invariant: attached payment covers the fee estimate.
pub fn invariant_fee_covered(required: U256, provided: U256) -> Result<(), GatewayError> {
    if provided < required {
        return Err(GatewayError::InsufficientFee { required, provided });
    }
    Ok(())
}

/// Invariant: only trusted relayers deliver proofs.
///
/// An empty allow-list admits every submitter; the light client is then the
/// only gate.
pub fn invariant_trusted_relayer(
    trusted: &[Address],
    submitter: &Address,
) -> Result<(), GatewayError> {
    if !trusted.is_empty() && !trusted.contains(submitter) {
        return Err(GatewayError::AccessDenied(*submitter));
    }
    Ok(())
}

/// Invariant: a response is only accepted for a pending query.
pub fn invariant_pending(status: QueryStatus, query_id: QueryId) -> Result<(), GatewayError> {
    if status.can_transition_to(QueryStatus::Fulfilled) {
        return Ok(());
    }
    match status {
        QueryStatus::Unknown => Err(GatewayError::UnknownQuery(query_id)),
        _ => Err(GatewayError::AlreadyFulfilled(query_id)),
    }
}
