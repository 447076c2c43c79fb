//! # Transaction Queue Gateway
//!
//! The external on-chain transaction queue. The approval handler hands each
//! `ApprovalRequested` event to a gateway and does not wait for mining.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Timestamp, User};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// A single approval handed to the transaction queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTransaction {
    /// Identifier of the originating `ApprovalRequested` event.
    pub request_id: Uuid,
    /// Approval recipient.
    pub user: User,
    /// When the service asked for the approval.
    pub requested_at: Timestamp,
}

/// The transaction queue refused a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transaction queue rejected approval {request_id}: {reason}")]
pub struct GatewayError {
    /// Rejected request.
    pub request_id: Uuid,
    /// Queue-provided reason.
    pub reason: String,
}

/// Submits approval transactions to the on-chain queue.
#[async_trait]
pub trait TransactionQueueGateway: Send + Sync {
    /// Enqueue an approval. Returns once the queue accepted it.
    async fn submit(&self, approval: ApprovalTransaction) -> Result<(), GatewayError>;
}

/// Default gateway: logs the handoff.
#[derive(Debug, Default)]
pub struct LoggingTransactionQueue;

#[async_trait]
impl TransactionQueueGateway for LoggingTransactionQueue {
    async fn submit(&self, approval: ApprovalTransaction) -> Result<(), GatewayError> {
        info!(
            request_id = %approval.request_id,
            user_id = %approval.user.id,
            address = %approval.user.address,
            "Approval transaction queued"
        );
        Ok(())
    }
}

/// Gateway that keeps every submission in memory.
#[derive(Debug, Default)]
pub struct RecordingTransactionQueue {
    submitted: Mutex<Vec<ApprovalTransaction>>,
}

impl RecordingTransactionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions so far, oldest first.
    pub fn submitted(&self) -> Vec<ApprovalTransaction> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl TransactionQueueGateway for RecordingTransactionQueue {
    async fn submit(&self, approval: ApprovalTransaction) -> Result<(), GatewayError> {
        self.submitted.lock().push(approval);
        Ok(())
    }
}
