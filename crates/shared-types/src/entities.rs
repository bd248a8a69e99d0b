//! # Core Domain Entities
//!
//! Defines the query-protocol entities shared across subsystems.
//!
//! ## Clusters
//!
//! - **Primitives**: `Address`, `Hash`, `Bytes`, `U256`
//! - **Requests**: `QueryRequest`, `QueryResponse`
//! - **Identifiers**: `QueryId`, `StoreKey`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes as SerdeBytes};
use std::fmt;

use crate::errors::ParseError;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte hash (keccak-256 output or a storage slot key).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Opaque byte payload (messages, proofs, raw slot values).
pub type Bytes = Vec<u8>;

/// Identifier of the chain a request reads from.
pub type ChainId = u32;

/// Parse a `0x`-prefixed (or bare) hex string into a 20-byte address.
pub fn parse_address(s: &str) -> Result<Address, ParseError> {
    parse_fixed::<20>(s)
}

/// Parse a `0x`-prefixed (or bare) hex string into a 32-byte hash.
pub fn parse_hash(s: &str) -> Result<Hash, ParseError> {
    parse_fixed::<32>(s)
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(ParseError::InvalidLength {
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Hex rendering used in logs and error messages.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// =============================================================================
// REQUESTS
// =============================================================================

/// One piece of source-chain state to fetch and prove.
///
/// Requests are immutable once they are part of a bundle; the order of a
/// bundle determines the order of the proven results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Chain the state lives on.
    pub dst_chain_id: ChainId,
    /// Contract or account to read from.
    pub to: Address,
    /// Block height to read at.
    pub height: U256,
    /// 32-byte storage slot key.
    pub slot: Hash,
}

impl QueryRequest {
    /// Create a new request.
    pub fn new(dst_chain_id: ChainId, to: Address, height: u64, slot: Hash) -> Self {
        Self {
            dst_chain_id,
            to,
            height: U256::from(height),
            slot,
        }
    }
}

/// Proof delivered by a relayer for a previously issued query.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Identifier returned by `send_query`.
    pub query_id: QueryId,
    /// Light-client specific proof; decodes to the ordered raw results.
    #[serde_as(as = "SerdeBytes")]
    pub proof: Bytes,
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Content-and-nonce derived identifier correlating a bundle to its response.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryId(pub Hash);

impl QueryId {
    /// Returns the underlying bytes.
    pub const fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

impl fmt::Debug for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryId({})", to_hex(&self.0))
    }
}

/// Height-independent cache key for a `(chain, account, slot)` triple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey(pub Hash);

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

impl fmt::Debug for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreKey({})", to_hex(&self.0))
    }
}
