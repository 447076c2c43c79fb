//! # Shared Bus - Event Bus for Account Events
//!
//! One-way, in-process message transport between the account service and the
//! runtime workers that hand approvals to the external transaction queue.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ User Accounts    │                    │ Approval Handler │
//! │ queue_approval() │    publish()       │                  │
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery Semantics
//!
//! **At-most-once.** The bus is a bounded broadcast channel:
//! - an event published while nobody is subscribed is dropped (and counted),
//! - a subscriber that falls more than `capacity` events behind skips the
//!   overwritten events,
//! - publishers never block and never observe consumer progress.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{AccountEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events buffered per subscriber before the oldest are overwritten.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
