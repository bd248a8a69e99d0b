//! Shared fixtures for consumer tests.

use primitive_types::U256;
use shared_bus::InMemoryEventBus;
use shared_types::{Address, Bytes, CallContext, QueryId, QueryRequest, QueryResponse};
use sq_01_query_codec::{encode_results, encode_uint};
use sq_02_gateway::{
    GatewayApi, GatewayConfig, GatewayError, GatewayService, StaticLightClient,
};
use std::sync::Arc;

use crate::config::ConsumerConfig;

pub const USER: Address = [0x11; 20];
pub const RELAYER: Address = [0x22; 20];
pub const STRANGER: Address = [0x33; 20];

pub struct Fixture {
    pub bus: Arc<InMemoryEventBus>,
    pub gateway: Arc<GatewayService>,
    pub light_client: Arc<StaticLightClient>,
    pub config: ConsumerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let gateway = Arc::new(GatewayService::with_flat_fees(
            GatewayConfig::for_testing(),
            bus.clone(),
        ));
        let config = ConsumerConfig::for_testing();
        let light_client = Arc::new(StaticLightClient::accepting());
        gateway.register_light_client(config.light_client, light_client.clone());
        Self {
            bus,
            gateway,
            light_client,
            config,
        }
    }

    pub fn user_ctx(&self) -> CallContext {
        CallContext::new(USER, 1_000)
    }

    pub fn owner_ctx(&self) -> CallContext {
        CallContext::new(self.config.owner, 1_000)
    }
}

pub fn requests(n: usize) -> Vec<QueryRequest> {
    (0..n)
        .map(|i| QueryRequest::new(1 + i as u32, [0xE0 + i as u8; 20], 10_000, [i as u8; 32]))
        .collect()
}

pub fn uint_result(value: U256) -> Bytes {
    encode_uint(value)
}

pub async fn deliver(
    fixture: &Fixture,
    query_id: QueryId,
    results: &[Bytes],
) -> Result<(), GatewayError> {
    deliver_at(fixture, 1_010, query_id, results).await
}

pub async fn deliver_at(
    fixture: &Fixture,
    timestamp: u64,
    query_id: QueryId,
    results: &[Bytes],
) -> Result<(), GatewayError> {
    fixture
        .gateway
        .receive_query(
            &CallContext::new(RELAYER, timestamp),
            QueryResponse {
                query_id,
                proof: encode_results(results),
            },
        )
        .await
}
