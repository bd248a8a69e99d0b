//! # Domain Value Objects
//!
//! Immutable value types for the query gateway.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::Bytes;

/// Lifecycle of a query identifier.
///
/// ```text
/// [Unknown] ──send_query──→ [Pending] ──receive_query──→ [Fulfilled]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryStatus {
    /// Never issued by this gateway.
    #[default]
    Unknown,
    /// Issued, waiting for a verified response.
    Pending,
    /// A verified response was accepted.
    Fulfilled,
}

impl QueryStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: QueryStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unknown, Self::Pending) | (Self::Pending, Self::Fulfilled)
        )
    }
}

/// Latest proven value of a `(chain, account, slot)` triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResult {
    /// Height the value was proven at.
    pub height: U256,
    /// Raw slot value.
    pub result: Bytes,
}
