//! # Shared Bus - Event Bus for Protocol Events
//!
//! Every observable effect of the query protocol is an event on this bus:
//! the relayer learns what to prove from `Packet`, indexers follow
//! `SaveQueryData` and `ReceiveQuery`, and applications watch consumer events
//! such as `VoteCasted`.
//!
//! ```text
//! ┌──────────────┐   publish()    ┌──────────────┐  subscribe()  ┌──────────────┐
//! │   Gateway    │ ─────────────▶ │  Event Bus   │ ────────────▶ │   Relayer    │
//! │  Consumers   │                │              │               │  Observers   │
//! └──────────────┘                └──────────────┘               └──────────────┘
//! ```
//!
//! Records carry the emitting address and a bus-wide sequence number so that
//! subscribers can reconstruct emission order across emitters.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventRecord, EventTopic, ProtocolEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
