//! # Consumer Base
//!
//! Identity, gateway binding and access control shared by every consumer.

use parking_lot::RwLock;
use shared_types::{to_hex, Address, Bytes, CallContext, QueryId, QueryRequest};
use sq_02_gateway::{CallbackError, GatewayApi, QueryCallback};
use sq_telemetry::{metric_inc, CONSUMER_RESULTS};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use crate::config::ConsumerConfig;
use crate::domain::ConsumerError;

/// State every consumer embeds.
pub struct ConsumerBase {
    /// Account allowed to rebind.
    owner: Address,
    /// Consumer address.
    address: Address,
    /// Gateway used to issue queries.
    gateway: RwLock<Arc<dyn GatewayApi>>,
    /// Light client attached to every query.
    light_client: RwLock<Address>,
    /// Handle the gateway calls back through.
    callback: Weak<dyn QueryCallback>,
}

impl ConsumerBase {
    /// Create the base of the consumer that `callback` points to.
    ///
    /// Meant to be called from inside `Arc::new_cyclic`; [`bind`](Self::bind)
    /// must follow once the consumer is constructed.
    pub fn new(
        config: &ConsumerConfig,
        gateway: Arc<dyn GatewayApi>,
        callback: Weak<dyn QueryCallback>,
    ) -> Self {
        Self {
            owner: config.owner,
            address: config.address,
            gateway: RwLock::new(gateway),
            light_client: RwLock::new(config.light_client),
            callback,
        }
    }

    /// Register the callback with the current gateway.
    pub fn bind(&self) {
        self.gateway
            .read()
            .bind_callback(self.address, self.callback.clone());
    }

    /// Owner account.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Consumer address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current gateway.
    pub fn gateway(&self) -> Arc<dyn GatewayApi> {
        self.gateway.read().clone()
    }

    /// Current light client.
    pub fn light_client(&self) -> Address {
        *self.light_client.read()
    }

    /// Fail unless `ctx.sender` is the owner.
    pub fn only_owner(&self, ctx: &CallContext) -> Result<(), ConsumerError> {
        if ctx.sender != self.owner {
            return Err(ConsumerError::AccessDenied(ctx.sender));
        }
        Ok(())
    }

    /// Fail unless `ctx.sender` is the bound gateway.
    pub fn only_gateway(&self, ctx: &CallContext) -> Result<(), ConsumerError> {
        if ctx.sender != self.gateway.read().address() {
            return Err(ConsumerError::AccessDenied(ctx.sender));
        }
        Ok(())
    }

    /// Switch to another gateway and bind the callback there.
    pub fn set_gateway(
        &self,
        ctx: &CallContext,
        gateway: Arc<dyn GatewayApi>,
    ) -> Result<(), ConsumerError> {
        self.only_owner(ctx)?;
        gateway.bind_callback(self.address, self.callback.clone());
        info!(
            consumer = %to_hex(&self.address),
            gateway = %to_hex(&gateway.address()),
            "Gateway rebound"
        );
        *self.gateway.write() = gateway;
        Ok(())
    }

    /// Change the light client attached to future queries.
    pub fn set_light_client(
        &self,
        ctx: &CallContext,
        light_client: Address,
    ) -> Result<(), ConsumerError> {
        self.only_owner(ctx)?;
        debug!(
            consumer = %to_hex(&self.address),
            light_client = %to_hex(&light_client),
            "Light client changed"
        );
        *self.light_client.write() = light_client;
        Ok(())
    }

    /// Issue `requests` through the gateway as this consumer.
    ///
    /// The caller's origin and payment carry over.
    pub async fn send(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<QueryId, ConsumerError> {
        let gateway = self.gateway();
        let light_client = self.light_client();
        let query_id = gateway
            .send_query(&ctx.forward(self.address), requests, message, light_client)
            .await?;
        Ok(query_id)
    }
}

/// Common surface of every consumer.
pub trait Consumer {
    /// Embedded base state.
    fn base(&self) -> &ConsumerBase;

    /// Owner account.
    fn owner(&self) -> Address {
        self.base().owner()
    }

    /// Consumer address.
    fn address(&self) -> Address {
        self.base().address()
    }

    /// Light client attached to new queries.
    fn light_client(&self) -> Address {
        self.base().light_client()
    }

    /// Owner-only: switch gateways.
    fn set_gateway(
        &self,
        ctx: &CallContext,
        gateway: Arc<dyn GatewayApi>,
    ) -> Result<(), ConsumerError> {
        self.base().set_gateway(ctx, gateway)
    }

    /// Owner-only: change the light client.
    fn set_light_client(
        &self,
        ctx: &CallContext,
        light_client: Address,
    ) -> Result<(), ConsumerError> {
        self.base().set_light_client(ctx, light_client)
    }
}

/// Count the outcome of a callback and convert it for the gateway.
pub(crate) fn settle(
    consumer: &'static str,
    query_id: QueryId,
    outcome: Result<(), ConsumerError>,
) -> Result<(), CallbackError> {
    match outcome {
        Ok(()) => {
            metric_inc!(CONSUMER_RESULTS, &[consumer, "applied"]);
            debug!(consumer, query_id = %query_id, "Query result applied");
            Ok(())
        }
        Err(e) => {
            metric_inc!(CONSUMER_RESULTS, &[consumer, "rejected"]);
            warn!(consumer, query_id = %query_id, error = %e, "Query result rejected");
            Err(e.into())
        }
    }
}
