//! Fee Estimator Adapter
//!
//! Implements the `FeeEstimator` port with a linear price.

use crate::config::GatewayConfig;
use crate::ports::outbound::FeeEstimator;
use primitive_types::U256;

/// `base_fee + per_request_fee * request_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatFeeEstimator {
    /// Fixed part of every fee.
    pub base_fee: U256,
    /// Price of one request.
    pub per_request_fee: U256,
}

impl FlatFeeEstimator {
    /// Create with explicit prices.
    pub fn new(base_fee: U256, per_request_fee: U256) -> Self {
        Self {
            base_fee,
            per_request_fee,
        }
    }

    /// Prices taken from the gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.base_fee, config.per_request_fee)
    }

    /// Zero-priced estimator.
    pub fn free() -> Self {
        Self::new(U256::zero(), U256::zero())
    }
}

impl FeeEstimator for FlatFeeEstimator {
    fn estimate_fee(&self, request_count: usize) -> U256 {
        self.per_request_fee
            .saturating_mul(U256::from(request_count))
            .saturating_add(self.base_fee)
    }
}
