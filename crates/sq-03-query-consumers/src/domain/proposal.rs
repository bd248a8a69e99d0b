//! # Proposals
//!
//! Voting proposals and per-voter records.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::HashMap;

/// Voting state of a proposal at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    /// `now < expires_at`; votes may be issued.
    Open,
    /// `now >= expires_at`; no new vote queries.
    Expired,
}

/// A voter's record on one proposal. Once `has_voted` is set it never
/// changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterInfo {
    /// Whether a vote was counted.
    pub has_voted: bool,
    /// `true` for yes.
    pub vote: bool,
}

/// A proposal and its tallies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Identifier, starting at 1.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Account that created the proposal.
    pub creator: Address,
    /// Creation timestamp.
    pub created_at: u64,
    /// First timestamp at which the proposal is expired.
    pub expires_at: u64,
    /// Snapshot height for ownership proofs.
    pub height: U256,
    /// Yes votes.
    pub yes_count: u64,
    /// No votes.
    pub no_count: u64,
    /// Counted votes by voter.
    ballots: HashMap<Address, VoterInfo>,
    /// Voters in the order their votes were counted.
    voters: Vec<Address>,
}

impl Proposal {
    /// Create an open proposal.
    pub fn new(
        id: u64,
        title: String,
        description: String,
        creator: Address,
        created_at: u64,
        duration_secs: u64,
        height: U256,
    ) -> Self {
        Self {
            id,
            title,
            description,
            creator,
            created_at,
            expires_at: created_at.saturating_add(duration_secs),
            height,
            yes_count: 0,
            no_count: 0,
            ballots: HashMap::new(),
            voters: Vec::new(),
        }
    }

    /// State at `now`.
    pub fn state(&self, now: u64) -> ProposalState {
        if now < self.expires_at {
            ProposalState::Open
        } else {
            ProposalState::Expired
        }
    }

    /// Record of `voter`; default if they have not voted.
    pub fn voter_info(&self, voter: &Address) -> VoterInfo {
        self.ballots.get(voter).copied().unwrap_or_default()
    }

    /// Count a vote. Returns `false` if `voter` already voted.
    pub fn record_vote(&mut self, voter: Address, vote: bool) -> bool {
        if self.ballots.contains_key(&voter) {
            return false;
        }
        self.ballots.insert(
            voter,
            VoterInfo {
                has_voted: true,
                vote,
            },
        );
        self.voters.push(voter);
        if vote {
            self.yes_count += 1;
        } else {
            self.no_count += 1;
        }
        true
    }

    /// Read-only snapshot.
    pub fn view(&self) -> ProposalView {
        ProposalView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            creator: self.creator,
            created_at: self.created_at,
            expires_at: self.expires_at,
            height: self.height,
            yes_count: self.yes_count,
            no_count: self.no_count,
            voter_info: self.voters.iter().map(|v| self.voter_info(v)).collect(),
            voters: self.voters.clone(),
        }
    }
}

/// Snapshot of a proposal returned by reads.
///
/// `voters[i]` cast `voter_info[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    /// Identifier.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Creator.
    pub creator: Address,
    /// Creation timestamp.
    pub created_at: u64,
    /// Expiry timestamp.
    pub expires_at: u64,
    /// Snapshot height.
    pub height: U256,
    /// Yes votes.
    pub yes_count: u64,
    /// No votes.
    pub no_count: u64,
    /// Voter records in counting order.
    pub voter_info: Vec<VoterInfo>,
    /// Voters in counting order.
    pub voters: Vec<Address>,
}
