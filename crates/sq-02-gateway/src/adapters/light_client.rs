//! Light Client Adapters
//!
//! Implements the `LightClient` port.

use crate::ports::outbound::LightClient;
use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// Light client with a fixed verdict.
///
/// Stands in for the on-chain light client in development networks and tests.
#[derive(Debug)]
pub struct StaticLightClient {
    accept: AtomicBool,
    verifications: AtomicU64,
}

impl StaticLightClient {
    /// Accepts every proof.
    pub fn accepting() -> Self {
        Self::with_verdict(true)
    }

    /// Rejects every proof.
    pub fn rejecting() -> Self {
        Self::with_verdict(false)
    }

    fn with_verdict(accept: bool) -> Self {
        Self {
            accept: AtomicBool::new(accept),
            verifications: AtomicU64::new(0),
        }
    }

    /// Flip the verdict.
    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// Number of `verify` calls served.
    pub fn verifications(&self) -> u64 {
        self.verifications.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LightClient for StaticLightClient {
    async fn verify(&self, height: U256, _proof: &[u8]) -> bool {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        let accept = self.accept.load(Ordering::SeqCst);
        debug!(%height, accept, "Static light client verdict");
        accept
    }
}

/// Light client that trusts everything up to a synced checkpoint height.
///
/// Heights beyond the checkpoint are not yet known to the client; empty
/// proofs are never accepted.
#[derive(Debug)]
pub struct CheckpointLightClient {
    checkpoint: RwLock<U256>,
}

impl CheckpointLightClient {
    /// Create with an initial checkpoint.
    pub fn new(checkpoint: U256) -> Self {
        Self {
            checkpoint: RwLock::new(checkpoint),
        }
    }

    /// Current checkpoint.
    pub fn checkpoint(&self) -> U256 {
        *self.checkpoint.read()
    }

    /// Move the checkpoint forward. Lower heights are ignored.
    pub fn advance(&self, height: U256) {
        let mut checkpoint = self.checkpoint.write();
        if height > *checkpoint {
            *checkpoint = height;
        }
    }
}

#[async_trait]
impl LightClient for CheckpointLightClient {
    async fn verify(&self, height: U256, proof: &[u8]) -> bool {
        let checkpoint = self.checkpoint();
        let accept = !proof.is_empty() && height <= checkpoint;
        debug!(%height, %checkpoint, accept, "Checkpoint light client verdict");
        accept
    }
}
