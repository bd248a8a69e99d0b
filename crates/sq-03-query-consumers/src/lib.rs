//! # SQ-03 Query Consumers
//!
//! Contracts-as-services that issue queries through the gateway and act on
//! the verified results.
//!
//! **Subsystem ID:** 03  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//! **Status:** Production-Ready
//!
//! ## Consumers
//!
//! | Consumer | Issues | On result |
//! |----------|--------|-----------|
//! | [`BalanceQuery`] | One balance slot per chain + decimals | Rescale to 18 decimals, add to `balance_of` |
//! | [`CustomQuery`] | Any bundle | Cache raw results by bundle and by id |
//! | [`Voting`] | NFT ownership proof + vote | Count once per voter if owned |
//!
//! Every consumer is created as an `Arc`, binds itself to its gateway, and
//! only accepts callbacks whose sender is that gateway's address.
//!
//! ## Module Structure
//!
//! ```text
//! sq-03-query-consumers/
//! ├── domain/          # Proposal, VoterInfo, ConsumerError
//! ├── algorithms/      # message codecs, decimal rescaling
//! └── application/     # ConsumerBase, BalanceQuery, CustomQuery, Voting
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

// Re-exports
pub use algorithms::{
    decode_balance_message, decode_custom_message, decode_vote_message, encode_balance_message,
    encode_custom_message, encode_vote_message, VoteMessage,
};
pub use application::{BalanceQuery, Consumer, ConsumerBase, CustomQuery, Voting};
pub use config::ConsumerConfig;
pub use domain::{ConsumerError, Proposal, ProposalState, ProposalView, VoterInfo};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
