//! # SQ-02 Query Gateway
//!
//! Issues nonce-bound query identifiers, gates proof delivery behind a light
//! client and fans verified results out to consumer callbacks.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//! **Status:** Production-Ready
//!
//! ## Query Lifecycle
//!
//! ```text
//! Consumer ──send_query──→ Gateway ──Packet──→ Relayer
//!                                                 │
//! Consumer ←─on_query_result── Gateway ←─receive_query┘
//!                                │
//!                     LightClient::verify(height, proof)
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Unique ids | Nonce advanced atomically with id derivation |
//! | Single fulfilment | `Pending → Fulfilled` re-checked under the state lock |
//! | No unverified writes | Verification and decoding precede persistence |
//! | Durable results | Callback failures never roll back stored results |
//!
//! ## Module Structure
//!
//! ```text
//! sq-02-gateway/
//! ├── domain/          # QueryStatus, QueryRecord, GatewayState, errors
//! ├── ports/           # GatewayApi, LightClient, FeeEstimator, QueryCallback
//! ├── adapters/        # Static/Checkpoint light clients, flat fees
//! └── application/     # GatewayService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{CheckpointLightClient, FlatFeeEstimator, StaticLightClient};
pub use application::GatewayService;
pub use config::{ConfigError, GatewayConfig};
pub use domain::{GatewayError, GatewayState, QueryRecord, QueryStatus, SavedSlot, StoredResult};
pub use ports::{
    CallbackError, CallbackInvocation, FeeEstimator, GatewayApi, LightClient, MockCallback,
    QueryCallback,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
