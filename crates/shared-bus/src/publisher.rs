//! # Event Publisher
//!
//! The sending half of the bus and its in-memory implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::{AccountEvent, EventFilter};
use crate::subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionGuard};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Live subscription count per filter key.
pub(crate) type SubscriptionRegistry = Arc<Mutex<HashMap<String, usize>>>;

/// Hands events to the bus.
///
/// The returned count is how many subscribers were handed the event, not how
/// many have processed it.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast `event`; returns the receiver count, `0` when dropped.
    async fn publish(&self, event: AccountEvent) -> usize;

    /// Events offered to the bus so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Single-process bus over `tokio::sync::broadcast`.
///
/// Every subscriber sees every event published after it subscribed, up to
/// `capacity` events of backlog.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<AccountEvent>,
    registry: SubscriptionRegistry,
    published: AtomicU64,
    dropped: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            registry: SubscriptionRegistry::default(),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            capacity,
        }
    }

    /// Start receiving events that match `filter`.
    ///
    /// Events published before this call are never seen.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let key = filter.key();
        *self.registry.lock().entry(key.clone()).or_insert(0) += 1;
        debug!(filter = %key, "Subscription opened");

        let guard = SubscriptionGuard::new(Arc::clone(&self.registry), key);
        Subscription::new(self.sender.subscribe(), filter, guard)
    }

    /// [`Self::subscribe`] as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Open receivers, whatever their filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Open subscriptions created with exactly `filter`.
    #[must_use]
    pub fn subscriptions_for(&self, filter: &EventFilter) -> usize {
        self.registry
            .lock()
            .get(&filter.key())
            .copied()
            .unwrap_or(0)
    }

    /// Events published while nobody was subscribed.
    #[must_use]
    pub fn events_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Per-subscriber backlog limit.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: AccountEvent) -> usize {
        let kind = event.kind();
        let user_id = event.user_id();
        self.published.fetch_add(1, Ordering::Relaxed);

        let Ok(receivers) = self.sender.send(event) else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(event = kind, user_id = %user_id, "No subscriber, event dropped");
            return 0;
        };

        debug!(event = kind, user_id = %user_id, receivers, "Event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
