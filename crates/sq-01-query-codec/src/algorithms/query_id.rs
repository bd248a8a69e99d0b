//! # Query Identifiers
//!
//! Envelope derivation, envelope encoding and the identifiers built on it.

use super::bindings::{sol_requests, to_sol_address};
use crate::domain::QueryEnvelope;
use alloy_primitives::Bytes as SolBytes;
use alloy_sol_types::SolValue;
use sha3::{Digest, Keccak256};
use shared_types::{Address, Bytes, Hash, QueryId, QueryRequest, StoreKey};

/// keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Build the envelope for a bundle issued by `callback`.
pub fn derive_envelope(
    callback: Address,
    requests: Vec<QueryRequest>,
    message: Bytes,
    light_client: Address,
) -> QueryEnvelope {
    QueryEnvelope {
        callback,
        requests,
        message,
        light_client,
    }
}

/// Canonical encoding of the envelope.
///
/// `abi.encode(address callback, (uint32,address,uint256,bytes32)[] requests,
/// bytes message, address lightClient)`.
pub fn encode_envelope(envelope: &QueryEnvelope) -> Bytes {
    (
        to_sol_address(&envelope.callback),
        sol_requests(&envelope.requests),
        SolBytes::from(envelope.message.clone()),
        to_sol_address(&envelope.light_client),
    )
        .abi_encode_params()
}

/// `keccak256(encode_envelope(envelope) ‖ nonce as big-endian u64)`.
pub fn derive_query_id(envelope: &QueryEnvelope, nonce: u64) -> QueryId {
    let mut packed = encode_envelope(envelope);
    packed.extend_from_slice(&nonce.to_be_bytes());
    QueryId(keccak256(&packed))
}

/// `keccak256(uint32 chain ‖ address ‖ bytes32 slot)`, tightly packed.
pub fn store_key(req: &QueryRequest) -> StoreKey {
    let mut packed = Vec::with_capacity(4 + 20 + 32);
    packed.extend_from_slice(&req.dst_chain_id.to_be_bytes());
    packed.extend_from_slice(&req.to);
    packed.extend_from_slice(&req.slot);
    StoreKey(keccak256(&packed))
}

/// Hash of `abi.encode(requests)`, used to key caches by request content.
pub fn bundle_key(requests: &[QueryRequest]) -> Hash {
    keccak256(&sol_requests(requests).abi_encode())
}
