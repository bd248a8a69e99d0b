//! # Gateway Service
//!
//! Application service orchestrating query issue and proof delivery.
//!
//! ## Locking
//!
//! Nonce, status table, result store and fee ledger live in one
//! `Mutex<GatewayState>`. The lock is only taken for synchronous sections;
//! light-client verification, event publication and callback dispatch run
//! without it. A delivery re-checks the status when it commits, so two racing
//! deliveries of the same query resolve to one success and one
//! `AlreadyFulfilled`.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use primitive_types::U256;
use shared_bus::{EventPublisher, ProtocolEvent};
use shared_types::{
    to_hex, Address, Bytes, CallContext, QueryId, QueryRequest, QueryResponse, StoreKey,
};
use sq_01_query_codec::{decode_results_exact, derive_envelope, encode_envelope};
use sq_telemetry::{
    metric_dec, metric_inc, time_histogram, CALLBACK_FAILURES, PENDING_QUERIES, PROOFS_REJECTED,
    QUERIES_FULFILLED, QUERIES_SENT, VERIFY_DURATION,
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use crate::adapters::FlatFeeEstimator;
use crate::config::GatewayConfig;
use crate::domain::{
    invariant_bundle_size, invariant_fee_covered, invariant_non_empty_bundle,
    invariant_trusted_relayer, GatewayError, GatewayState, QueryRecord, QueryStatus,
    StoredResult,
};
use crate::ports::{FeeEstimator, GatewayApi, LightClient, QueryCallback};

/// Gateway Service - owns the nonce and the query table.
pub struct GatewayService {
    /// Configuration.
    config: GatewayConfig,
    /// Nonce, records, store and fees.
    state: Mutex<GatewayState>,
    /// Fee pricing.
    fees: Arc<dyn FeeEstimator>,
    /// Event sink.
    events: Arc<dyn EventPublisher>,
    /// Light clients by address.
    light_clients: RwLock<HashMap<Address, Arc<dyn LightClient>>>,
    /// Consumer callbacks by address.
    callbacks: RwLock<HashMap<Address, Weak<dyn QueryCallback>>>,
}

impl GatewayService {
    /// Create a new gateway.
    pub fn new(
        config: GatewayConfig,
        fees: Arc<dyn FeeEstimator>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            state: Mutex::new(GatewayState::new()),
            fees,
            events,
            light_clients: RwLock::new(HashMap::new()),
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Create a gateway priced by the fees in `config`.
    pub fn with_flat_fees(config: GatewayConfig, events: Arc<dyn EventPublisher>) -> Self {
        let fees = Arc::new(FlatFeeEstimator::from_config(&config));
        Self::new(config, fees, events)
    }

    /// Get configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Number of queries waiting for a proof.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending_count()
    }

    fn callback_failed(&self, query_id: QueryId, reason: String) -> GatewayError {
        metric_inc!(CALLBACK_FAILURES);
        warn!(query_id = %query_id, reason = %reason, "Consumer callback failed");
        GatewayError::CallbackFailed { query_id, reason }
    }

    /// Run the bound light client over every request height.
    async fn verify_all(
        &self,
        client: &dyn LightClient,
        query_id: QueryId,
        requests: &[QueryRequest],
        proof: &[u8],
    ) -> Result<(), GatewayError> {
        let _timer = time_histogram!(VERIFY_DURATION);
        for req in requests {
            if !client.verify(req.height, proof).await {
                metric_inc!(PROOFS_REJECTED);
                warn!(query_id = %query_id, height = %req.height, "Proof rejected");
                return Err(GatewayError::ProofRejected { height: req.height });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayApi for GatewayService {
    async fn send_query(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
        message: Bytes,
        light_client: Address,
    ) -> Result<QueryId, GatewayError> {
        let count = requests.len();
        invariant_non_empty_bundle(count)?;
        invariant_bundle_size(count, self.config.max_requests_per_bundle)?;
        let required = self.fees.estimate_fee(count);
        invariant_fee_covered(required, ctx.value)?;

        let envelope = derive_envelope(ctx.sender, requests, message.clone(), light_client);
        let encoded_envelope = encode_envelope(&envelope);

        let record = self.state.lock().issue(envelope, ctx.origin, ctx.value)?;
        let query_id = record.query_id;

        metric_inc!(QUERIES_SENT);
        metric_inc!(PENDING_QUERIES);
        info!(
            query_id = %query_id,
            nonce = record.nonce,
            requests = count,
            callback = %to_hex(&ctx.sender),
            "Query issued"
        );

        self.events
            .publish(
                self.config.address,
                ProtocolEvent::Packet {
                    requester: ctx.origin,
                    query_id,
                    encoded_envelope,
                    message,
                    light_client,
                    callback: ctx.sender,
                },
            )
            .await;

        Ok(query_id)
    }

    async fn receive_query(
        &self,
        ctx: &CallContext,
        response: QueryResponse,
    ) -> Result<(), GatewayError> {
        invariant_trusted_relayer(&self.config.trusted_relayers, &ctx.sender)?;
        let query_id = response.query_id;

        let envelope = {
            let state = self.state.lock();
            state.pending_record(&query_id)?.envelope.clone()
        };

        let client = {
            let clients = self.light_clients.read();
            clients.get(&envelope.light_client).cloned()
        }
        .ok_or(GatewayError::LightClientUnavailable(envelope.light_client))?;

        self.verify_all(client.as_ref(), query_id, &envelope.requests, &response.proof)
            .await?;

        let results = decode_results_exact(&response.proof, envelope.len()).map_err(|e| {
            warn!(query_id = %query_id, error = %e, "Proof did not decode");
            GatewayError::from(e)
        })?;

        let saved = {
            let mut state = self.state.lock();
            state.fulfill(&query_id, &results)?
        };

        metric_inc!(QUERIES_FULFILLED);
        metric_dec!(PENDING_QUERIES);
        info!(query_id = %query_id, results = results.len(), "Query fulfilled");

        for slot in saved {
            debug!(store_key = %slot.store_key, height = %slot.height, "Saved query data");
            self.events
                .publish(
                    self.config.address,
                    ProtocolEvent::SaveQueryData {
                        store_key: slot.store_key,
                        height: slot.height,
                        result: slot.result,
                    },
                )
                .await;
        }

        self.events
            .publish(
                self.config.address,
                ProtocolEvent::ReceiveQuery {
                    query_id,
                    message: envelope.message.clone(),
                    light_client: envelope.light_client,
                    callback: envelope.callback,
                    results: results.clone(),
                },
            )
            .await;

        let callback = {
            let callbacks = self.callbacks.read();
            callbacks.get(&envelope.callback).and_then(Weak::upgrade)
        };
        let Some(callback) = callback else {
            return Err(self.callback_failed(
                query_id,
                format!("no live callback bound at {}", to_hex(&envelope.callback)),
            ));
        };

        let callback_ctx = CallContext {
            sender: self.config.address,
            origin: ctx.origin,
            value: U256::zero(),
            timestamp: ctx.timestamp,
        };
        callback
            .on_query_result(
                &callback_ctx,
                query_id,
                results,
                envelope.requests,
                envelope.message,
            )
            .await
            .map_err(|e| self.callback_failed(query_id, e.to_string()))
    }

    fn query_status(&self, query_id: &QueryId) -> QueryStatus {
        self.state.lock().status(query_id)
    }

    fn stored_result(&self, key: &StoreKey) -> Option<StoredResult> {
        self.state.lock().stored(key).cloned()
    }

    fn nonce(&self) -> u64 {
        self.state.lock().nonce()
    }

    fn pending_query(&self, query_id: &QueryId) -> Option<QueryRecord> {
        self.state.lock().record(query_id).cloned()
    }

    fn collected_fees(&self) -> U256 {
        self.state.lock().collected_fees()
    }

    fn estimate_fee(&self, request_count: usize) -> U256 {
        self.fees.estimate_fee(request_count)
    }

    fn address(&self) -> Address {
        self.config.address
    }

    fn bind_callback(&self, address: Address, callback: Weak<dyn QueryCallback>) {
        debug!(callback = %to_hex(&address), "Callback bound");
        self.callbacks.write().insert(address, callback);
    }

    fn register_light_client(&self, address: Address, client: Arc<dyn LightClient>) {
        debug!(light_client = %to_hex(&address), "Light client registered");
        self.light_clients.write().insert(address, client);
    }
}
