//! # Event Subscriber
//!
//! Filtered views over the bus: a [`Subscription`] for tests and pull-style
//! consumers, and an [`EventStream`] for tasks that react to every record.

use crate::events::{EventFilter, EventRecord};
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Source of filtered subscriptions.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to records matching `filter`, starting now.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Records matching a filter. Ends when the bus is dropped.
pub type EventStream = Pin<Box<dyn Stream<Item = EventRecord> + Send>>;

/// Receiving end of one subscription.
pub struct Subscription {
    receiver: broadcast::Receiver<EventRecord>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<EventRecord>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next matching record, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventRecord> {
        loop {
            match self.receiver.recv().await {
                Ok(record) if self.filter.matches(&record) => return Some(record),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Subscriber lagged, records dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching record if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<EventRecord>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(record) if self.filter.matches(&record) => return Ok(Some(record)),
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Every matching record that is already buffered, in emission order.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        let mut out = Vec::new();
        while let Ok(Some(record)) = self.try_recv() {
            out.push(record);
        }
        out
    }

    /// Filter this subscription applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Turn the subscription into a stream. Lagged records are skipped.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        let Self { receiver, filter } = self;
        Box::pin(
            BroadcastStream::new(receiver).filter_map(move |item| match item {
                Ok(record) if filter.matches(&record) => Some(record),
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Stream lagged, records dropped");
                    None
                }
            }),
        )
    }
}
