//! # Protocol Events
//!
//! Defines every event that flows through the shared bus. Events are the
//! durable, externally observed contract of the protocol.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes, QueryId, StoreKey, U256};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolEvent {
    // =========================================================================
    // GATEWAY
    // =========================================================================
    /// A query bundle was accepted; the only channel through which relayers
    /// learn what to fetch and prove.
    Packet {
        /// Account that started the call chain.
        requester: Address,
        /// Identifier of the bundle.
        query_id: QueryId,
        /// Canonical envelope encoding.
        encoded_envelope: Bytes,
        /// Opaque consumer payload.
        message: Bytes,
        /// Light client bound to the query.
        light_client: Address,
        /// Consumer receiving the result.
        callback: Address,
    },

    /// One proven slot value was persisted.
    SaveQueryData {
        /// Height-independent key of the slot.
        store_key: StoreKey,
        /// Height the value was proven at.
        height: U256,
        /// Raw slot value.
        result: Bytes,
    },

    /// A response was accepted and the query fulfilled.
    ReceiveQuery {
        /// Identifier of the fulfilled bundle.
        query_id: QueryId,
        /// Opaque consumer payload.
        message: Bytes,
        /// Light client that accepted the proof.
        light_client: Address,
        /// Consumer receiving the result.
        callback: Address,
        /// Raw results, aligned with the bundle.
        results: Vec<Bytes>,
    },

    // =========================================================================
    // CONSUMERS
    // =========================================================================
    /// A voting proposal was created.
    ProposalCreated {
        /// Account that created the proposal.
        creator: Address,
        /// Proposal identifier.
        proposal_id: u64,
        /// Title.
        title: String,
        /// Description.
        description: String,
        /// Voting period in seconds.
        duration_secs: u64,
    },

    /// A vote was counted.
    VoteCasted {
        /// Voter whose ownership was proven.
        voter: Address,
        /// Proposal voted on.
        proposal_id: u64,
        /// `true` for yes.
        vote: bool,
    },
}

impl ProtocolEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Packet { .. } | Self::SaveQueryData { .. } | Self::ReceiveQuery { .. } => {
                EventTopic::Gateway
            }
            Self::ProposalCreated { .. } | Self::VoteCasted { .. } => EventTopic::Consumer,
        }
    }

    /// Event name as it appears in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Packet { .. } => "Packet",
            Self::SaveQueryData { .. } => "SaveQueryData",
            Self::ReceiveQuery { .. } => "ReceiveQuery",
            Self::ProposalCreated { .. } => "ProposalCreated",
            Self::VoteCasted { .. } => "VoteCasted",
        }
    }
}

/// An event together with its emitter and bus sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Address of the component that emitted the event.
    pub emitter: Address,
    /// Bus-wide emission order, starting at 0.
    pub sequence: u64,
    /// The event.
    pub event: ProtocolEvent,
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Gateway events (`Packet`, `SaveQueryData`, `ReceiveQuery`).
    Gateway,
    /// Consumer application events.
    Consumer,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Emitters to include. Empty means all emitters.
    pub emitters: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            emitters: Vec::new(),
        }
    }

    /// Create a filter for events from specific emitters.
    #[must_use]
    pub fn from_emitters(emitters: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            emitters,
        }
    }

    /// Check if a record matches this filter.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&record.event.topic());

        let emitter_match = self.emitters.is_empty() || self.emitters.contains(&record.emitter);

        topic_match && emitter_match
    }
}
