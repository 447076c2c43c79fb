//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the account service. The host application
//! supplies production implementations; in-memory ones live below.

use crate::domain::entities::{NewUser, UserFilter, UserPatch};
use crate::domain::errors::{KVStoreError, QueueError, RepositoryError, VerifierError};
use async_trait::async_trait;
use shared_types::{Timestamp, User, UserId};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Persistence client for user documents.
///
/// Each call is atomic with respect to the others.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new document.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Find by primary id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Find the single document matching `filter`.
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, RepositoryError>;

    /// Apply `patch` to the document matching `filter`, returning it updated.
    ///
    /// Fails with `NotFound` when nothing matches; nothing is written on error.
    async fn find_one_and_update(
        &self,
        filter: UserFilter,
        patch: UserPatch,
    ) -> Result<User, RepositoryError>;
}

/// Recovers the signer of a personal message.
pub trait SignatureVerifier: Send + Sync {
    /// Recover the EIP-55 address that signed `message`.
    fn recover_signer(&self, message: &str, signature: &str) -> Result<String, VerifierError>;
}

/// The external on-chain transaction queue.
#[async_trait]
pub trait ApprovalQueue: Send + Sync {
    /// Schedule an approval transaction for `user`. Returns once the request
    /// is handed off, not when it is mined.
    async fn queue_approval_transaction(&self, user: &User) -> Result<(), QueueError>;
}

/// Receives account lifecycle notifications.
#[async_trait]
pub trait LinkNotifier: Send + Sync {
    /// `user` now has a linked Twitter account.
    async fn account_linked(&self, user: &User);
}

/// Byte-oriented storage underneath `KvUserRepository`.
///
/// Implemented by `RocksDbStore` in account-runtime and by [`InMemoryKVStore`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Apply `operations` all together or not at all.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Every entry whose key starts with `prefix`.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// One write inside a [`KeyValueStore::atomic_batch_write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::Delete { key: key.into() }
    }
}

/// Clock used for `created_at` and `updated_at`.
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// Wall clock. A clock before 1970 reads as `0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

/// Ordered map standing in for RocksDB when no data directory is configured.
///
/// Contents are lost with the process.
#[derive(Debug, Default)]
pub struct InMemoryKVStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Exclusive borrow: no reader can see a partial batch.
        for operation in operations {
            match operation {
                BatchOperation::Put { key, value } => {
                    self.entries.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.entries.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
