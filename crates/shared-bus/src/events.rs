//! # Account Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, User, UserId};
use uuid::Uuid;

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    // =========================================================================
    // APPROVALS
    // =========================================================================
    /// An on-chain approval transaction should be scheduled for this user.
    /// Source: User Accounts | Target: Approval Handler
    ApprovalRequested {
        /// Unique per dispatch, so repeated approvals for one user stay distinct.
        request_id: Uuid,
        /// The user the approval is for.
        user: User,
        /// When the request was dispatched.
        requested_at: Timestamp,
    },

    // =========================================================================
    // ACCOUNTS
    // =========================================================================
    /// A wallet address and a Twitter identity were linked.
    AccountLinked {
        /// The user after linking.
        user: User,
    },
}

impl AccountEvent {
    /// Build an approval request with a fresh request id.
    #[must_use]
    pub fn approval_requested(user: User, requested_at: Timestamp) -> Self {
        Self::ApprovalRequested {
            request_id: Uuid::new_v4(),
            user,
            requested_at,
        }
    }

    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ApprovalRequested { .. } => EventTopic::Approvals,
            Self::AccountLinked { .. } => EventTopic::Accounts,
        }
    }

    /// The user this event concerns.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::ApprovalRequested { user, .. } | Self::AccountLinked { user } => user.id,
        }
    }

    /// Short, stable name used as a log field and metric label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApprovalRequested { .. } => "approval_requested",
            Self::AccountLinked { .. } => "account_linked",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Approval transaction requests.
    Approvals,
    /// Account lifecycle notifications.
    Accounts,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Users to include. Empty means all users.
    pub users: Vec<UserId>,
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
            users: Vec::new(),
        }
    }

    /// Restrict the filter to events about one user.
    #[must_use]
    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.users.push(user_id);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &AccountEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let user_match = self.users.is_empty() || self.users.contains(&event.user_id());

        topic_match && user_match
    }

    /// Key used to group subscriptions for bookkeeping.
    pub(crate) fn key(&self) -> String {
        format!("{:?}", self.topics)
    }
}
