//! # Account Runtime
//!
//! Owns the service container and the background handlers.
//!
//! ## Startup Sequence
//!
//! 1. Subscribe the approval handler to the event bus
//! 2. Spawn it with a shutdown receiver
//!
//! ## Shutdown Sequence
//!
//! 1. Signal shutdown to all handlers
//! 2. Wait for them to finish (bounded)

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use shared_bus::{EventFilter, EventTopic};

use crate::adapters::TransactionQueueGateway;
use crate::container::ServiceContainer;
use crate::handlers::{ApprovalHandler, ApprovalStats};

/// How long shutdown waits for handlers to drain.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The running account service.
pub struct AccountRuntime {
    container: Arc<ServiceContainer>,
    gateway: Arc<dyn TransactionQueueGateway>,
    shutdown_tx: watch::Sender<bool>,
    approval_task: Mutex<Option<JoinHandle<ApprovalStats>>>,
}

impl AccountRuntime {
    pub fn new(container: ServiceContainer, gateway: Arc<dyn TransactionQueueGateway>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container: Arc::new(container),
            gateway,
            shutdown_tx,
            approval_task: Mutex::new(None),
        }
    }

    /// Start background handlers. Calling twice has no effect.
    pub fn start(&self) {
        let mut task = self.approval_task.lock();
        if task.is_some() {
            warn!("Account runtime already started");
            return;
        }

        let subscription = self
            .container
            .event_bus
            .subscribe(EventFilter::topics(vec![EventTopic::Approvals]));
        let handler = ApprovalHandler::new(subscription, Arc::clone(&self.gateway));
        *task = Some(tokio::spawn(handler.run(self.shutdown_tx.subscribe())));

        info!(
            environment = %self.container.config.environment,
            twitter_oauth = self.container.twitter.is_some(),
            "Account runtime started"
        );
    }

    /// Stop handlers and wait for them, returning the approval counters.
    pub async fn shutdown(&self) -> Option<ApprovalStats> {
        info!("Initiating graceful shutdown...");

        if self.shutdown_tx.send(true).is_err() {
            warn!("No handler was listening for shutdown");
        }

        let task = self.approval_task.lock().take()?;
        match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
            Ok(Ok(stats)) => {
                info!("Shutdown complete");
                Some(stats)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Approval handler panicked");
                None
            }
            Err(_) => {
                error!(grace = ?SHUTDOWN_GRACE, "Approval handler did not stop in time");
                None
            }
        }
    }

    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
