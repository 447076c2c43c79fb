//! # Event Bus Adapter
//!
//! Implements the approval queue and link notifications by publishing to the
//! shared event bus.
//!
//! ## Event Flow
//!
//! ```text
//! [User Accounts] ──ApprovalRequested──→ [Event Bus] ──→ [Approval Handler] ──→ Transaction Queue
//!                 ──AccountLinked──────→ [Event Bus] ──→ (any subscriber)
//! ```
//!
//! Delivery is at-most-once: an event published while nobody listens is gone.

use crate::domain::errors::QueueError;
use crate::ports::outbound::{ApprovalQueue, LinkNotifier, SystemTimeSource, TimeSource};
use async_trait::async_trait;
use shared_bus::events::AccountEvent;
use shared_bus::publisher::EventPublisher;
use shared_types::User;
use std::sync::Arc;
use tracing::debug;

/// Publishes account events on the shared bus.
pub struct BusEventAdapter<P: EventPublisher + ?Sized> {
    publisher: Arc<P>,
    time_source: Arc<dyn TimeSource>,
}

impl<P: EventPublisher + ?Sized> BusEventAdapter<P> {
    /// Create an adapter stamping events with system time.
    pub fn new(publisher: Arc<P>) -> Self {
        Self::with_time_source(publisher, Arc::new(SystemTimeSource))
    }

    /// Create an adapter with an explicit clock.
    pub fn with_time_source(publisher: Arc<P>, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            publisher,
            time_source,
        }
    }
}

#[async_trait]
impl<P: EventPublisher + ?Sized> ApprovalQueue for BusEventAdapter<P> {
    async fn queue_approval_transaction(&self, user: &User) -> Result<(), QueueError> {
        let event = AccountEvent::approval_requested(user.clone(), self.time_source.now());
        let receivers = self.publisher.publish(event).await;

        if receivers == 0 {
            return Err(QueueError::Undelivered);
        }

        debug!(user_id = %user.id, receivers, "Approval request published");
        Ok(())
    }
}

#[async_trait]
impl<P: EventPublisher + ?Sized> LinkNotifier for BusEventAdapter<P> {
    async fn account_linked(&self, user: &User) {
        let receivers = self
            .publisher
            .publish(AccountEvent::AccountLinked { user: user.clone() })
            .await;
        debug!(user_id = %user.id, receivers, "Account linked event published");
    }
}
