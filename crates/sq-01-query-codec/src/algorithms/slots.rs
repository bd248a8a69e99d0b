//! # Storage Slots
//!
//! Helpers for computing the storage slot a request should read.

use super::bindings::{to_sol_address, to_sol_uint};
use super::query_id::keccak256;
use alloy_sol_types::SolValue;
use primitive_types::U256;
use shared_types::{Address, Hash};

/// Slot of `mapping(address => ...)` entry `key` for a mapping declared at
/// slot `index`: `keccak256(pad32(key) ‖ pad32(index))`.
///
/// ERC-20 balances and ERC-721 owner balances are both read this way.
pub fn mapping_slot(key: &Address, index: U256) -> Hash {
    keccak256(&(to_sol_address(key), to_sol_uint(index)).abi_encode_params())
}
