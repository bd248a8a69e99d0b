//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the gateway.

mod fee_estimator;
mod light_client;

pub use fee_estimator::FlatFeeEstimator;
pub use light_client::{CheckpointLightClient, StaticLightClient};
