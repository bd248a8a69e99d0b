//! # Solidity Bindings
//!
//! Solidity view of the wire formats, and conversions between the shared
//! domain primitives and their alloy counterparts.

use alloy_primitives::{Address as SolAddress, FixedBytes, U256 as SolU256};
use alloy_sol_types::SolValue;
use primitive_types::U256;
use shared_types::{Address, Bytes, QueryRequest};

mod sol_types {
    alloy_sol_types::sol! {
        struct QueryRequest {
            uint32 dstChainId;
            address to;
            uint256 height;
            bytes32 slot;
        }
    }
}

pub(crate) use sol_types::QueryRequest as SolQueryRequest;

/// Domain address as an ABI `address`.
pub fn to_sol_address(addr: &Address) -> SolAddress {
    SolAddress::from(*addr)
}

/// ABI `address` back to the domain type.
pub fn from_sol_address(addr: SolAddress) -> Address {
    *addr.0
}

/// Domain `U256` as an ABI `uint256`.
pub fn to_sol_uint(value: U256) -> SolU256 {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    SolU256::from_be_bytes(word)
}

/// ABI `uint256` back to the domain type.
pub fn from_sol_uint(value: SolU256) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}

/// `abi.encode(uint256 value)`: one big-endian word.
pub fn encode_uint(value: U256) -> Bytes {
    to_sol_uint(value).abi_encode()
}

pub(crate) fn sol_request(req: &QueryRequest) -> SolQueryRequest {
    SolQueryRequest {
        dstChainId: req.dst_chain_id,
        to: to_sol_address(&req.to),
        height: to_sol_uint(req.height),
        slot: FixedBytes(req.slot),
    }
}

pub(crate) fn sol_requests(requests: &[QueryRequest]) -> Vec<SolQueryRequest> {
    requests.iter().map(sol_request).collect()
}
