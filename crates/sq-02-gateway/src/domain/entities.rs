//! # Domain Entities
//!
//! Query records and the state table kept by one gateway instance.

use super::errors::GatewayError;
use super::invariants::invariant_pending;
use super::value_objects::{QueryStatus, StoredResult};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes, QueryId, StoreKey};
use sq_01_query_codec::{derive_query_id, store_key, QueryEnvelope};
use std::collections::HashMap;

/// Everything the gateway remembers about an issued query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Identifier handed back to the consumer.
    pub query_id: QueryId,
    /// Nonce the identifier was derived with.
    pub nonce: u64,
    /// Account that started the call chain.
    pub requester: Address,
    /// Envelope the identifier was derived from.
    pub envelope: QueryEnvelope,
    /// Fee paid with the query.
    pub fee: U256,
    /// Current status.
    pub status: QueryStatus,
}

/// One slot value persisted while fulfilling a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedSlot {
    /// Height-independent key.
    pub store_key: StoreKey,
    /// Height the value was proven at.
    pub height: U256,
    /// Raw value.
    pub result: Bytes,
}

/// Mutable state of one gateway.
///
/// All fields change together under a single lock; see
/// `GatewayService` for the locking discipline.
#[derive(Debug, Default)]
pub struct GatewayState {
    nonce: u64,
    records: HashMap<QueryId, QueryRecord>,
    store: HashMap<StoreKey, StoredResult>,
    collected_fees: U256,
    pending: usize,
}

impl GatewayState {
    /// Fresh state with nonce 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce to be consumed.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Total fees accounted so far.
    pub fn collected_fees(&self) -> U256 {
        self.collected_fees
    }

    /// Number of queries still waiting for a response.
    pub fn pending_count(&self) -> usize {
        self.pending
    }

    /// Status of an identifier.
    pub fn status(&self, query_id: &QueryId) -> QueryStatus {
        self.records
            .get(query_id)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    /// Record of an identifier.
    pub fn record(&self, query_id: &QueryId) -> Option<&QueryRecord> {
        self.records.get(query_id)
    }

    /// Latest value under a store key.
    pub fn stored(&self, key: &StoreKey) -> Option<&StoredResult> {
        self.store.get(key)
    }

    /// Derive the identifier from the current nonce, advance the nonce and
    /// record the query as pending.
    ///
    /// Fails without touching state once the nonce cannot advance.
    pub fn issue(
        &mut self,
        envelope: QueryEnvelope,
        requester: Address,
        fee: U256,
    ) -> Result<QueryRecord, GatewayError> {
        let nonce = self.nonce;
        self.nonce = nonce.checked_add(1).ok_or(GatewayError::NonceExhausted)?;
        let query_id = derive_query_id(&envelope, nonce);

        let record = QueryRecord {
            query_id,
            nonce,
            requester,
            envelope,
            fee,
            status: QueryStatus::Pending,
        };
        self.records.insert(query_id, record.clone());
        self.collected_fees = self.collected_fees.saturating_add(fee);
        self.pending += 1;
        Ok(record)
    }

    /// The pending record for `query_id`, or the matching status error.
    pub fn pending_record(&self, query_id: &QueryId) -> Result<&QueryRecord, GatewayError> {
        invariant_pending(self.status(query_id), *query_id)?;
        self.records
            .get(query_id)
            .ok_or(GatewayError::UnknownQuery(*query_id))
    }

    /// Persist `results` for every request of the query and mark it fulfilled.
    ///
    /// `results` must already be aligned with the bundle.
    pub fn fulfill(
        &mut self,
        query_id: &QueryId,
        results: &[Bytes],
    ) -> Result<Vec<SavedSlot>, GatewayError> {
        let record = self.pending_record(query_id)?;
        if record.envelope.len() != results.len() {
            return Err(GatewayError::ResultCountMismatch {
                expected: record.envelope.len(),
                got: results.len(),
            });
        }

        let saved: Vec<SavedSlot> = record
            .envelope
            .requests
            .iter()
            .zip(results)
            .map(|(req, result)| SavedSlot {
                store_key: store_key(req),
                height: req.height,
                result: result.clone(),
            })
            .collect();

        for slot in &saved {
            self.store.insert(
                slot.store_key,
                StoredResult {
                    height: slot.height,
                    result: slot.result.clone(),
                },
            );
        }

        if let Some(record) = self.records.get_mut(query_id) {
            record.status = QueryStatus::Fulfilled;
        }
        self.pending = self.pending.saturating_sub(1);
        Ok(saved)
    }
}
