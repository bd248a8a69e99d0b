//! # Gateway Configuration
//!
//! Configuration for the gateway service.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::{parse_address, Address};
use std::env;
use thiserror::Error;

/// Default price of one request (0.001 ether).
pub const DEFAULT_PER_REQUEST_FEE: u64 = 1_000_000_000_000_000;

/// Default cap on requests per bundle.
pub const DEFAULT_MAX_REQUESTS_PER_BUNDLE: usize = 64;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Parse failure.
        reason: String,
    },
}

/// Gateway configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address the gateway calls consumers from.
    pub address: Address,

    /// Accounts allowed to deliver proofs. Empty admits everyone.
    pub trusted_relayers: Vec<Address>,

    /// Fixed part of every fee.
    pub base_fee: U256,

    /// Price of one request.
    pub per_request_fee: U256,

    /// Largest accepted bundle.
    pub max_requests_per_bundle: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            address: [0x47; 20],
            trusted_relayers: Vec::new(),
            base_fee: U256::zero(),
            per_request_fee: U256::from(DEFAULT_PER_REQUEST_FEE),
            max_requests_per_bundle: DEFAULT_MAX_REQUESTS_PER_BUNDLE,
        }
    }
}

impl GatewayConfig {
    /// Create a config for testing (free queries, small bundles).
    pub fn for_testing() -> Self {
        Self {
            address: [0x47; 20],
            trusted_relayers: Vec::new(),
            base_fee: U256::zero(),
            per_request_fee: U256::zero(),
            max_requests_per_bundle: 8,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SQ_GATEWAY_ADDRESS`: 0x-prefixed gateway address
    /// - `SQ_TRUSTED_RELAYERS`: comma-separated relayer addresses
    /// - `SQ_BASE_FEE`: decimal base fee in wei
    /// - `SQ_PER_REQUEST_FEE`: decimal per-request fee in wei
    /// - `SQ_MAX_REQUESTS`: bundle size cap
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, starting from the
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("SQ_GATEWAY_ADDRESS") {
            config.address = parse_address(raw.trim()).map_err(|e| invalid("SQ_GATEWAY_ADDRESS", e))?;
        }

        if let Some(raw) = lookup("SQ_TRUSTED_RELAYERS") {
            config.trusted_relayers = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_address(s).map_err(|e| invalid("SQ_TRUSTED_RELAYERS", e)))
                .collect::<Result<_, _>>()?;
        }

        if let Some(raw) = lookup("SQ_BASE_FEE") {
            config.base_fee =
                U256::from_dec_str(raw.trim()).map_err(|e| invalid("SQ_BASE_FEE", format!("{e:?}")))?;
        }

        if let Some(raw) = lookup("SQ_PER_REQUEST_FEE") {
            config.per_request_fee = U256::from_dec_str(raw.trim())
                .map_err(|e| invalid("SQ_PER_REQUEST_FEE", format!("{e:?}")))?;
        }

        if let Some(raw) = lookup("SQ_MAX_REQUESTS") {
            config.max_requests_per_bundle =
                raw.trim().parse().map_err(|e| invalid("SQ_MAX_REQUESTS", e))?;
        }

        Ok(config)
    }
}

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
