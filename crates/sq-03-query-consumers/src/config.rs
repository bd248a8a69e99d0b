//! # Consumer Configuration
//!
//! Identity and defaults shared by every query consumer.

use serde::{Deserialize, Serialize};
use shared_types::Address;

/// Consumer configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Account allowed to rebind the gateway and light client.
    pub owner: Address,

    /// Address the consumer issues queries from and receives callbacks at.
    pub address: Address,

    /// Light client attached to every query.
    pub light_client: Address,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            owner: [0x0A; 20],
            address: [0xC0; 20],
            light_client: [0xA1; 20],
        }
    }
}

impl ConsumerConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Same config at a different consumer address.
    pub fn at(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}
