//! # Inbound Ports
//!
//! API trait defining what the gateway can do.

use crate::domain::{GatewayError, QueryRecord, QueryStatus, StoredResult};
use crate::ports::outbound::{LightClient, QueryCallback};
use async_trait::async_trait;
use primitive_types::U256;
use shared_types::{Address, Bytes, CallContext, QueryId, QueryRequest, QueryResponse, StoreKey};
use std::sync::{Arc, Weak};

/// Gateway API - inbound port.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Issue a query bundle on behalf of the calling consumer.
    ///
    /// `ctx.sender` becomes the callback, `ctx.origin` the requester and
    /// `ctx.value` the fee paid.
    async fn send_query(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
        message: Bytes,
        light_client: Address,
    ) -> Result<QueryId, GatewayError>;

    /// Accept a relayed proof, persist its results and notify the consumer.
    async fn receive_query(
        &self,
        ctx: &CallContext,
        response: QueryResponse,
    ) -> Result<(), GatewayError>;

    /// Status of a query identifier.
    fn query_status(&self, query_id: &QueryId) -> QueryStatus;

    /// Latest proven value under a store key.
    fn stored_result(&self, key: &StoreKey) -> Option<StoredResult>;

    /// Next nonce to be consumed.
    fn nonce(&self) -> u64;

    /// Full record of an issued query.
    fn pending_query(&self, query_id: &QueryId) -> Option<QueryRecord>;

    /// Total fees collected.
    fn collected_fees(&self) -> U256;

    /// Fee required for a bundle of `request_count` requests.
    fn estimate_fee(&self, request_count: usize) -> U256;

    /// Address the gateway calls consumers from.
    fn address(&self) -> Address;

    /// Bind a consumer address to its callback object.
    fn bind_callback(&self, address: Address, callback: Weak<dyn QueryCallback>);

    /// Register a light client under `address`.
    fn register_light_client(&self, address: Address, client: Arc<dyn LightClient>);
}
