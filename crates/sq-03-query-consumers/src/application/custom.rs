//! # Custom Query
//!
//! Caches raw proven storage words, keyed by the bundle they answer.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Bytes, CallContext, Hash, QueryId, QueryRequest};
use sq_01_query_codec::bundle_key;
use sq_02_gateway::{CallbackError, GatewayApi, QueryCallback};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::algorithms::{decode_custom_message, encode_custom_message};
use crate::application::base::{settle, Consumer, ConsumerBase};
use crate::config::ConsumerConfig;
use crate::domain::ConsumerError;

#[derive(Default)]
struct Cache {
    by_bundle: HashMap<Hash, Vec<Bytes>>,
    by_id: HashMap<QueryId, Vec<Bytes>>,
}

/// Raw-result cache consumer.
pub struct CustomQuery {
    base: ConsumerBase,
    cache: RwLock<Cache>,
}

impl CustomQuery {
    /// Create the consumer and bind it to `gateway`.
    pub fn new(config: ConsumerConfig, gateway: Arc<dyn GatewayApi>) -> Arc<Self> {
        let consumer = Arc::new_cyclic(|weak: &Weak<Self>| {
            let callback: Weak<dyn QueryCallback> = weak.clone();
            Self {
                base: ConsumerBase::new(&config, gateway, callback),
                cache: RwLock::new(Cache::default()),
            }
        });
        consumer.base.bind();
        consumer
    }

    /// Issue an arbitrary bundle.
    pub async fn query(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
    ) -> Result<QueryId, ConsumerError> {
        let message = encode_custom_message(ctx.sender);
        self.base.send(ctx, requests, message).await
    }

    /// Latest results delivered for exactly this bundle.
    pub fn get_cache(&self, requests: &[QueryRequest]) -> Option<Vec<Bytes>> {
        self.cache
            .read()
            .by_bundle
            .get(&bundle_key(requests))
            .cloned()
    }

    /// Results delivered for `query_id`.
    pub fn cached_by_id(&self, query_id: &QueryId) -> Option<Vec<Bytes>> {
        self.cache.read().by_id.get(query_id).cloned()
    }

    fn apply(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        requests: &[QueryRequest],
        message: &[u8],
    ) -> Result<(), ConsumerError> {
        self.base.only_gateway(ctx)?;
        decode_custom_message(message)?;
        let key = bundle_key(requests);
        let mut cache = self.cache.write();
        cache.by_bundle.insert(key, results.clone());
        cache.by_id.insert(query_id, results);
        debug!(query_id = %query_id, requests = requests.len(), "Results cached");
        Ok(())
    }
}

impl Consumer for CustomQuery {
    fn base(&self) -> &ConsumerBase {
        &self.base
    }
}

#[async_trait]
impl QueryCallback for CustomQuery {
    async fn on_query_result(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<(), CallbackError> {
        let outcome = self.apply(ctx, query_id, results, &requests, &message);
        settle("custom", query_id, outcome)
    }
}
