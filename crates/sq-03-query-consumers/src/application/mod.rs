//! # Application Layer
//!
//! The three consumers and the base they share.

pub mod balance;
pub mod base;
pub mod custom;
pub mod voting;

#[cfg(test)]
pub(crate) mod testing;

pub use balance::BalanceQuery;
pub use base::{Consumer, ConsumerBase};
pub use custom::CustomQuery;
pub use voting::Voting;
