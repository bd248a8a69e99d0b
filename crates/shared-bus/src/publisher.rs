//! # Event Publisher
//!
//! The publishing side of the bus and its in-memory implementation.

use crate::events::{EventFilter, EventRecord, ProtocolEvent};
use crate::subscriber::{EventStream, EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::{to_hex, Address};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Anything that can emit protocol events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event` on behalf of `emitter`.
    ///
    /// Returns how many subscribers were listening.
    async fn publish(&self, emitter: Address, event: ProtocolEvent) -> usize;

    /// Events published so far.
    fn events_published(&self) -> u64;
}

/// Broadcast-backed bus shared by the gateway, the consumers and relayers.
///
/// Every record gets the next bus-wide sequence number, whether or not
/// anyone is subscribed.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<EventRecord>,
    next_sequence: AtomicU64,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`] records of buffering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` records per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Stream of records matching `filter`, for long-running listeners.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Live subscriptions and streams.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, emitters = filter.emitters.len(), "Subscribed");
        Subscription::new(self.sender.subscribe(), filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, emitter: Address, event: ProtocolEvent) -> usize {
        let name = event.name();
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let record = EventRecord {
            emitter,
            sequence,
            event,
        };

        // A send error only means nobody is listening.
        let receivers = self.sender.send(record).unwrap_or(0);
        trace!(
            event = name,
            emitter = %to_hex(&emitter),
            sequence,
            receivers,
            "Event published"
        );
        receivers
    }

    fn events_published(&self) -> u64 {
        self.next_sequence.load(Ordering::SeqCst)
    }
}
