//! # Call Context
//!
//! Caller identity and payment attached to every state-mutating call.
//!
//! The gateway and the consumers never trust identity fields inside payloads;
//! `sender` in the context is authoritative.

use serde::{Deserialize, Serialize};

use crate::entities::{Address, U256};

/// Execution context of a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Immediate caller (a user, a consumer contract, or the gateway).
    pub sender: Address,
    /// Account that started the call chain.
    pub origin: Address,
    /// Payment attached to the call.
    pub value: U256,
    /// Unix timestamp of the enclosing block.
    pub timestamp: u64,
}

impl CallContext {
    /// Context for a call made directly by an externally owned account.
    pub fn new(sender: Address, timestamp: u64) -> Self {
        Self {
            sender,
            origin: sender,
            value: U256::zero(),
            timestamp,
        }
    }

    /// Attach a payment.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Context for a nested call issued by `contract` on behalf of this one.
    ///
    /// The origin and payment carry over; only the immediate sender changes.
    pub fn forward(&self, contract: Address) -> Self {
        Self {
            sender: contract,
            origin: self.origin,
            value: self.value,
            timestamp: self.timestamp,
        }
    }
}
