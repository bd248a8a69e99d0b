//! # Consumer Messages
//!
//! Payloads each consumer attaches to its queries. The gateway forwards them
//! untouched and hands them back with the results.
//!
//! | Consumer | Layout |
//! |----------|--------|
//! | Balance | `abi.encode(uint256[] decimals, address beneficiary)` |
//! | Custom | `abi.encode(address sender)` |
//! | Voting | `abi.encode(address voter, uint256 proposalId, bool vote)` |

use alloy_primitives::{Address as SolAddress, U256 as SolU256};
use alloy_sol_types::SolValue;
use primitive_types::U256;
use shared_types::{Address, Bytes};
use sq_01_query_codec::{from_sol_address, from_sol_uint, to_sol_address, to_sol_uint};

use crate::domain::ConsumerError;

fn invalid(err: alloy_sol_types::Error) -> ConsumerError {
    ConsumerError::InvalidMessage(err.to_string())
}

/// Encode the balance message.
pub fn encode_balance_message(decimals: &[U256], beneficiary: Address) -> Bytes {
    let decimals: Vec<SolU256> = decimals.iter().copied().map(to_sol_uint).collect();
    (decimals, to_sol_address(&beneficiary)).abi_encode_params()
}

/// Decode the balance message into `(decimals, beneficiary)`.
pub fn decode_balance_message(message: &[u8]) -> Result<(Vec<U256>, Address), ConsumerError> {
    let (decimals, beneficiary) =
        <(Vec<SolU256>, SolAddress)>::abi_decode_params(message, true).map_err(invalid)?;
    Ok((
        decimals.into_iter().map(from_sol_uint).collect(),
        from_sol_address(beneficiary),
    ))
}

/// Encode the custom-query message.
pub fn encode_custom_message(sender: Address) -> Bytes {
    to_sol_address(&sender).abi_encode()
}

/// Decode the custom-query message.
pub fn decode_custom_message(message: &[u8]) -> Result<Address, ConsumerError> {
    SolAddress::abi_decode(message, true)
        .map(from_sol_address)
        .map_err(invalid)
}

/// Decoded voting message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteMessage {
    /// Account casting the vote.
    pub voter: Address,
    /// Target proposal.
    pub proposal_id: u64,
    /// `true` for yes.
    pub vote: bool,
}

/// Encode the voting message.
pub fn encode_vote_message(voter: Address, proposal_id: u64, vote: bool) -> Bytes {
    (to_sol_address(&voter), SolU256::from(proposal_id), vote).abi_encode_params()
}

/// Decode the voting message.
pub fn decode_vote_message(message: &[u8]) -> Result<VoteMessage, ConsumerError> {
    let (voter, id, vote) =
        <(SolAddress, SolU256, bool)>::abi_decode_params(message, true).map_err(invalid)?;
    let proposal_id = u64::try_from(id).map_err(|_| {
        ConsumerError::InvalidMessage(format!("proposal id {id} out of range"))
    })?;
    Ok(VoteMessage {
        voter: from_sol_address(voter),
        proposal_id,
        vote,
    })
}
