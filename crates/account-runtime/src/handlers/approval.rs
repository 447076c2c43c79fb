//! # Approval Handler
//!
//! Consumes `ApprovalRequested` events and hands each one to the external
//! transaction queue.
//!
//! ```text
//! UserAccountService ──ApprovalRequested──→ Event Bus ──→ ApprovalHandler ──→ TransactionQueueGateway
//! ```
//!
//! Events published while the handler is not subscribed, or overwritten
//! while it lags, are never seen. Gateway failures are logged and the event
//! is not retried.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use shared_bus::{AccountEvent, Subscription};
use trustdrops_telemetry::{log_event, metric_inc, APPROVALS_QUEUED, EVENTS_DROPPED};

use crate::adapters::{ApprovalTransaction, TransactionQueueGateway};

const COMPONENT: &str = "approval-handler";

/// Counters reported when the handler stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalStats {
    /// Approvals accepted by the gateway.
    pub forwarded: u64,
    /// Approvals the gateway rejected.
    pub rejected: u64,
    /// Events skipped because the handler lagged.
    pub lagged: u64,
}

/// Forwards approval requests to the transaction queue.
pub struct ApprovalHandler {
    subscription: Subscription,
    gateway: Arc<dyn TransactionQueueGateway>,
    stats: ApprovalStats,
}

impl ApprovalHandler {
    /// `subscription` should be filtered to the approvals topic; other
    /// events are ignored.
    pub fn new(subscription: Subscription, gateway: Arc<dyn TransactionQueueGateway>) -> Self {
        Self {
            subscription,
            gateway,
            stats: ApprovalStats::default(),
        }
    }

    /// Run until `shutdown` flips to `true` or the bus closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ApprovalStats {
        info!("Approval handler started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Approval handler received shutdown signal");
                        break;
                    }
                }
                next = self.subscription.recv() => {
                    self.record_lag();
                    match next {
                        Some(event) => self.handle(event).await,
                        None => {
                            info!("Event bus closed, approval handler exiting");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            forwarded = self.stats.forwarded,
            rejected = self.stats.rejected,
            lagged = self.stats.lagged,
            "Approval handler stopped"
        );
        self.stats
    }

    async fn handle(&mut self, event: AccountEvent) {
        let AccountEvent::ApprovalRequested {
            request_id,
            user,
            requested_at,
        } = event
        else {
            return;
        };

        let user_id = user.id;
        let approval = ApprovalTransaction {
            request_id,
            user,
            requested_at,
        };

        match self.gateway.submit(approval).await {
            Ok(()) => {
                self.stats.forwarded += 1;
                metric_inc!(APPROVALS_QUEUED);
                log_event!(info, COMPONENT, "Approval forwarded", request_id = %request_id, user_id = %user_id);
            }
            Err(e) => {
                self.stats.rejected += 1;
                error!(request_id = %request_id, user_id = %user_id, error = %e, "Approval not queued");
            }
        }
    }

    fn record_lag(&mut self) {
        let total = self.subscription.lagged();
        if total > self.stats.lagged {
            let skipped = total - self.stats.lagged;
            self.stats.lagged = total;
            EVENTS_DROPPED
                .with_label_values(&["lagged"])
                .inc_by(skipped as f64);
            warn!(skipped, "Approval handler lagged; approvals lost");
        }
    }
}
