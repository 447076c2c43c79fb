//! # Event Subscriber
//!
//! The receiving half of the bus. A [`Subscription`] filters by topic on the
//! receiving side and keeps count of the events it missed by falling behind.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

use crate::events::{AccountEvent, EventFilter};
use crate::publisher::SubscriptionRegistry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every sender is gone; no further events will arrive.
    #[error("Event bus closed")]
    Closed,
}

/// Anything a worker can open a [`Subscription`] on.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Releases one registry slot for `key` on drop.
pub(crate) struct SubscriptionGuard {
    registry: SubscriptionRegistry,
    key: String,
}

impl SubscriptionGuard {
    pub(crate) fn new(registry: SubscriptionRegistry, key: String) -> Self {
        Self { registry, key }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        let mut registry = self.registry.lock();
        let remaining = registry.get_mut(&self.key).map(|open| {
            *open = open.saturating_sub(1);
            *open
        });
        if remaining == Some(0) {
            registry.remove(&self.key);
        }
        debug!(filter = %self.key, "Subscription closed");
    }
}

/// Receiver for events matching one [`EventFilter`].
pub struct Subscription {
    receiver: broadcast::Receiver<AccountEvent>,
    filter: EventFilter,
    lagged: u64,
    guard: SubscriptionGuard,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<AccountEvent>,
        filter: EventFilter,
        guard: SubscriptionGuard,
    ) -> Self {
        Self {
            receiver,
            filter,
            lagged: 0,
            guard,
        }
    }

    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus is dropped. Overwritten events are skipped
    /// and added to [`Self::lagged`].
    pub async fn recv(&mut self) -> Option<AccountEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => self.note_lag(missed),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking [`Self::recv`]: `Ok(None)` when nothing is buffered.
    pub fn try_recv(&mut self) -> Result<Option<AccountEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => self.note_lag(missed),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    fn note_lag(&mut self, missed: u64) {
        self.lagged += missed;
        debug!(missed, total = self.lagged, "Subscriber fell behind");
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Total events skipped because the backlog overflowed.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    /// Turn into a [`Stream`]; the registry slot moves with it.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            _guard: self.guard,
        }
    }
}

/// [`Subscription`] as a `tokio_stream::Stream`. Lag gaps are skipped silently.
pub struct EventStream {
    inner: BroadcastStream<AccountEvent>,
    filter: EventFilter,
    _guard: SubscriptionGuard,
}

impl EventStream {
    /// The filter this stream was opened with.
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = AccountEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                Some(Ok(event)) if self.filter.matches(&event) => {
                    return Poll::Ready(Some(event))
                }
                Some(Ok(_)) => {}
                Some(Err(BroadcastStreamRecvError::Lagged(missed))) => {
                    debug!(missed, "Event stream fell behind");
                }
                None => return Poll::Ready(None),
            }
        }
    }
}
