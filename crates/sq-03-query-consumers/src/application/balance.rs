//! # Balance Query
//!
//! Aggregates token balances proven on several chains into one
//! 18-decimal total per beneficiary.

use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use shared_types::{to_hex, Address, Bytes, CallContext, QueryId, QueryRequest};
use sq_02_gateway::{CallbackError, GatewayApi, QueryCallback};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::info;

use crate::algorithms::{
    decode_balance_message, encode_balance_message, rescale, result_to_uint, MAX_DECIMALS,
};
use crate::application::base::{settle, Consumer, ConsumerBase};
use crate::config::ConsumerConfig;
use crate::domain::ConsumerError;

/// Multi-chain balance aggregator.
pub struct BalanceQuery {
    base: ConsumerBase,
    balances: RwLock<HashMap<Address, U256>>,
}

impl BalanceQuery {
    /// Create the consumer and bind it to `gateway`.
    pub fn new(config: ConsumerConfig, gateway: Arc<dyn GatewayApi>) -> Arc<Self> {
        let consumer = Arc::new_cyclic(|weak: &Weak<Self>| {
            let callback: Weak<dyn QueryCallback> = weak.clone();
            Self {
                base: ConsumerBase::new(&config, gateway, callback),
                balances: RwLock::new(HashMap::new()),
            }
        });
        consumer.base.bind();
        consumer
    }

    /// Query one balance slot per request; `decimals[i]` is the precision of
    /// the token behind `requests[i]`.
    ///
    /// The caller becomes the beneficiary.
    pub async fn send_query(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
        decimals: Vec<U256>,
    ) -> Result<QueryId, ConsumerError> {
        if requests.len() != decimals.len() {
            return Err(ConsumerError::LengthMismatch {
                requests: requests.len(),
                decimals: decimals.len(),
            });
        }
        if let Some(bad) = decimals.iter().find(|d| **d > U256::from(MAX_DECIMALS)) {
            return Err(ConsumerError::InvalidDecimals(*bad));
        }
        let message = encode_balance_message(&decimals, ctx.sender);
        self.base.send(ctx, requests, message).await
    }

    /// Aggregated balance of `account`, 18 decimals.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances
            .read()
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    fn apply(
        &self,
        ctx: &CallContext,
        results: &[Bytes],
        message: &[u8],
    ) -> Result<(), ConsumerError> {
        self.base.only_gateway(ctx)?;
        let (decimals, beneficiary) = decode_balance_message(message)?;
        if results.len() != decimals.len() {
            return Err(ConsumerError::LengthMismatch {
                requests: results.len(),
                decimals: decimals.len(),
            });
        }

        let mut total = U256::zero();
        for (result, decimals) in results.iter().zip(decimals) {
            let amount = rescale(result_to_uint(result)?, decimals)?;
            total = total.checked_add(amount).ok_or(ConsumerError::Overflow)?;
        }

        let mut balances = self.balances.write();
        let balance = balances.entry(beneficiary).or_default();
        let updated = balance.checked_add(total).ok_or(ConsumerError::Overflow)?;
        *balance = updated;
        info!(
            beneficiary = %to_hex(&beneficiary),
            added = %total,
            balance = %updated,
            "Balance aggregated"
        );
        Ok(())
    }
}

impl Consumer for BalanceQuery {
    fn base(&self) -> &ConsumerBase {
        &self.base
    }
}

#[async_trait]
impl QueryCallback for BalanceQuery {
    async fn on_query_result(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        _requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<(), CallbackError> {
        settle("balance", query_id, self.apply(ctx, &results, &message))
    }
}
