//! # Adapter Implementations
//!
//! Concrete implementations of the account service's outbound ports, plus
//! the transaction queue gateway used by the approval handler.
//!
//! ```text
//! UserAccountService
//!   ├── UserRepository     ← MeteredRepository(KvUserRepository<store>)
//!   ├── SignatureVerifier  ← SignatureAdapter (TD-01)
//!   └── ApprovalQueue      ← BusEventAdapter(MeteredPublisher(InMemoryEventBus))
//!
//! ApprovalHandler
//!   └── TransactionQueueGateway ← LoggingTransactionQueue
//! ```

pub mod metered;
pub mod queue;
pub mod signature;
pub mod storage;
pub mod twitter;

pub use metered::{MeteredAccounts, MeteredPublisher, MeteredRepository};
pub use queue::{
    ApprovalTransaction, GatewayError, LoggingTransactionQueue, RecordingTransactionQueue,
    TransactionQueueGateway,
};
pub use signature::SignatureAdapter;
pub use storage::InMemoryKVStore;
pub use twitter::TwitterOAuthClient;
#[cfg(feature = "rocksdb")]
pub use storage::{RocksDbConfig, RocksDbStore};
