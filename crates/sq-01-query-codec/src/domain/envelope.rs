//! # Query Envelope
//!
//! The exact structure whose encoding, combined with a nonce, produces the
//! query identifier.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes, QueryRequest};

/// Derived description of one query bundle.
///
/// Field order is fixed: callback, requests, message, light client. Changing
/// the order or any field width changes every identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    /// Consumer that receives the result.
    pub callback: Address,
    /// Ordered, non-empty bundle.
    pub requests: Vec<QueryRequest>,
    /// Opaque consumer payload, returned unmodified to the callback.
    pub message: Bytes,
    /// Light client that must accept the proof.
    pub light_client: Address,
}

impl QueryEnvelope {
    /// Number of requests in the bundle.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
