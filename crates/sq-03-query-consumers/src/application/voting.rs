//! # Voting
//!
//! Proposals whose votes are admitted only when a proof shows the voter
//! holds the gating NFT on the source chain.
//!
//! ## Flow
//!
//! ```text
//! create_proposal ──→ Open ──(now >= expires_at)──→ Expired
//!                      │
//!        query_nft ────┘ (issue-time expiry check)
//!                      │
//!   on_query_result ───→ results[0] != 0 and not yet voted ──→ counted
//! ```
//!
//! Expiry is checked only when the ownership query is issued; a proof that
//! lands after `expires_at` still counts.

use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use shared_bus::{EventPublisher, ProtocolEvent};
use shared_types::{to_hex, Bytes, CallContext, QueryId, QueryRequest};
use sq_02_gateway::{CallbackError, GatewayApi, QueryCallback};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use crate::algorithms::{decode_vote_message, encode_vote_message, is_owned, VoteMessage};
use crate::application::base::{settle, Consumer, ConsumerBase};
use crate::config::ConsumerConfig;
use crate::domain::{ConsumerError, Proposal, ProposalState, ProposalView};

#[derive(Default)]
struct Ballot {
    proposals: BTreeMap<u64, Proposal>,
    last_id: u64,
}

/// NFT-gated voting consumer.
pub struct Voting {
    base: ConsumerBase,
    ballot: RwLock<Ballot>,
    events: Arc<dyn EventPublisher>,
}

impl Voting {
    /// Create the consumer and bind it to `gateway`.
    pub fn new(
        config: ConsumerConfig,
        gateway: Arc<dyn GatewayApi>,
        events: Arc<dyn EventPublisher>,
    ) -> Arc<Self> {
        let consumer = Arc::new_cyclic(|weak: &Weak<Self>| {
            let callback: Weak<dyn QueryCallback> = weak.clone();
            Self {
                base: ConsumerBase::new(&config, gateway, callback),
                ballot: RwLock::new(Ballot::default()),
                events,
            }
        });
        consumer.base.bind();
        consumer
    }

    /// Open a proposal for `duration_secs` from `ctx.timestamp`. Ownership
    /// proofs for it are read at `height`.
    pub async fn create_proposal(
        &self,
        ctx: &CallContext,
        title: String,
        description: String,
        duration_secs: u64,
        height: U256,
    ) -> Result<u64, ConsumerError> {
        if duration_secs == 0 {
            return Err(ConsumerError::ZeroDuration);
        }

        let proposal_id = {
            let mut ballot = self.ballot.write();
            ballot.last_id += 1;
            let id = ballot.last_id;
            ballot.proposals.insert(
                id,
                Proposal::new(
                    id,
                    title.clone(),
                    description.clone(),
                    ctx.sender,
                    ctx.timestamp,
                    duration_secs,
                    height,
                ),
            );
            id
        };

        info!(
            proposal_id,
            creator = %to_hex(&ctx.sender),
            duration_secs,
            "Proposal created"
        );
        self.events
            .publish(
                self.base.address(),
                ProtocolEvent::ProposalCreated {
                    creator: ctx.sender,
                    proposal_id,
                    title,
                    description,
                    duration_secs,
                },
            )
            .await;

        Ok(proposal_id)
    }

    /// Ask the gateway to prove the caller's NFT ownership, voting `vote`
    /// on `proposal_id` once the proof lands.
    pub async fn query_nft(
        &self,
        ctx: &CallContext,
        requests: Vec<QueryRequest>,
        proposal_id: u64,
        vote: bool,
    ) -> Result<QueryId, ConsumerError> {
        match self.proposal_state(proposal_id, ctx.timestamp) {
            None => return Err(ConsumerError::InvalidProposal(proposal_id)),
            Some(ProposalState::Expired) => {
                return Err(ConsumerError::ProposalExpired(proposal_id))
            }
            Some(ProposalState::Open) => {}
        }
        let message = encode_vote_message(ctx.sender, proposal_id, vote);
        self.base.send(ctx, requests, message).await
    }

    /// Snapshot of a proposal.
    pub fn get_proposal(&self, proposal_id: u64) -> Option<ProposalView> {
        self.ballot
            .read()
            .proposals
            .get(&proposal_id)
            .map(Proposal::view)
    }

    /// State of a proposal at `now`.
    pub fn proposal_state(&self, proposal_id: u64, now: u64) -> Option<ProposalState> {
        self.ballot
            .read()
            .proposals
            .get(&proposal_id)
            .map(|p| p.state(now))
    }

    /// Number of proposals created.
    pub fn proposal_count(&self) -> u64 {
        self.ballot.read().last_id
    }

    /// Returns the vote if it was counted.
    fn apply(
        &self,
        ctx: &CallContext,
        results: &[Bytes],
        message: &[u8],
    ) -> Result<Option<VoteMessage>, ConsumerError> {
        self.base.only_gateway(ctx)?;
        let cast = decode_vote_message(message)?;
        let ownership = results.first().ok_or(ConsumerError::EmptyResults)?;

        let mut ballot = self.ballot.write();
        let proposal = ballot
            .proposals
            .get_mut(&cast.proposal_id)
            .ok_or(ConsumerError::InvalidProposal(cast.proposal_id))?;

        if !is_owned(ownership) {
            debug!(
                voter = %to_hex(&cast.voter),
                proposal_id = cast.proposal_id,
                "No NFT, vote ignored"
            );
            return Ok(None);
        }
        if !proposal.record_vote(cast.voter, cast.vote) {
            debug!(
                voter = %to_hex(&cast.voter),
                proposal_id = cast.proposal_id,
                "Already voted"
            );
            return Ok(None);
        }
        info!(
            voter = %to_hex(&cast.voter),
            proposal_id = cast.proposal_id,
            vote = cast.vote,
            yes = proposal.yes_count,
            no = proposal.no_count,
            "Vote counted"
        );
        Ok(Some(cast))
    }
}

impl Consumer for Voting {
    fn base(&self) -> &ConsumerBase {
        &self.base
    }
}

#[async_trait]
impl QueryCallback for Voting {
    async fn on_query_result(
        &self,
        ctx: &CallContext,
        query_id: QueryId,
        results: Vec<Bytes>,
        _requests: Vec<QueryRequest>,
        message: Bytes,
    ) -> Result<(), CallbackError> {
        let outcome = self.apply(ctx, &results, &message);
        if let Ok(Some(cast)) = &outcome {
            self.events
                .publish(
                    self.base.address(),
                    ProtocolEvent::VoteCasted {
                        voter: cast.voter,
                        proposal_id: cast.proposal_id,
                        vote: cast.vote,
                    },
                )
                .await;
        }
        settle("voting", query_id, outcome.map(|_| ()))
    }
}
