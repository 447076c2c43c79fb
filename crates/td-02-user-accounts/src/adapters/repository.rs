//! # Key-Value User Repository
//!
//! Implements [`UserRepository`] on top of any [`KeyValueStore`].
//!
//! ## Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `user:<id>` | User document (JSON) |
//! | `idx:address:<address>` | `<id>` |
//! | `idx:twitter:<twitter id>` | `<id>` |
//!
//! Every write takes the store's write lock, checks the unique indexes and
//! commits document and index changes in one atomic batch, so a failed write
//! leaves every record as it was.

use crate::domain::entities::{NewUser, UserFilter, UserPatch};
use crate::domain::errors::RepositoryError;
use crate::ports::outbound::{
    BatchOperation, KeyValueStore, SystemTimeSource, TimeSource, UserRepository,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{User, UserId};
use std::sync::Arc;
use tracing::debug;

const USER_PREFIX: &str = "user:";
const ADDRESS_INDEX_PREFIX: &str = "idx:address:";
const TWITTER_INDEX_PREFIX: &str = "idx:twitter:";

fn user_key(id: &UserId) -> Vec<u8> {
    format!("{USER_PREFIX}{id}").into_bytes()
}

fn index_key(filter: &UserFilter) -> Vec<u8> {
    match filter {
        UserFilter::Address(address) => format!("{ADDRESS_INDEX_PREFIX}{address}").into_bytes(),
        UserFilter::TwitterId(twitter_id) => {
            format!("{TWITTER_INDEX_PREFIX}{twitter_id}").into_bytes()
        }
    }
}

/// User repository backed by a key-value store.
pub struct KvUserRepository<KV: KeyValueStore> {
    store: RwLock<KV>,
    time_source: Arc<dyn TimeSource>,
}

impl<KV: KeyValueStore> KvUserRepository<KV> {
    /// Create a repository stamping documents with system time.
    pub fn new(store: KV) -> Self {
        Self::with_time_source(store, Arc::new(SystemTimeSource))
    }

    /// Create a repository with an explicit clock.
    pub fn with_time_source(store: KV, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            store: RwLock::new(store),
            time_source,
        }
    }

    fn load(store: &KV, id: &UserId) -> Result<Option<User>, RepositoryError> {
        match store.get(&user_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn resolve(store: &KV, filter: &UserFilter) -> Result<Option<UserId>, RepositoryError> {
        let Some(bytes) = store.get(&index_key(filter))? else {
            return Ok(None);
        };
        let id = std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.parse::<UserId>().ok())
            .ok_or_else(|| {
                RepositoryError::Serialization(format!(
                    "corrupt {} index entry for {}",
                    filter.field(),
                    filter.value()
                ))
            })?;
        Ok(Some(id))
    }

    fn find(store: &KV, filter: &UserFilter) -> Result<Option<User>, RepositoryError> {
        match Self::resolve(store, filter)? {
            Some(id) => Self::load(store, &id),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<KV: KeyValueStore> UserRepository for KvUserRepository<KV> {
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut store = self.store.write();

        let address_index = UserFilter::Address(new_user.address.clone());
        if store.exists(&index_key(&address_index))? {
            return Err(RepositoryError::DuplicateAddress(new_user.address));
        }
        if let Some(twitter_id) = &new_user.twitter_id {
            if store.exists(&index_key(&UserFilter::TwitterId(twitter_id.clone())))? {
                return Err(RepositoryError::DuplicateTwitterId(twitter_id.clone()));
            }
        }

        let now = self.time_source.now();
        let user = User {
            id: UserId::new(),
            address: new_user.address,
            twitter_id: new_user.twitter_id,
            created_at: now,
            updated_at: now,
        };
        let id_bytes = user.id.to_string().into_bytes();

        let mut batch = vec![
            BatchOperation::put(user_key(&user.id), serde_json::to_vec(&user)?),
            BatchOperation::put(index_key(&address_index), id_bytes.clone()),
        ];
        if let Some(twitter_id) = &user.twitter_id {
            batch.push(BatchOperation::put(
                index_key(&UserFilter::TwitterId(twitter_id.clone())),
                id_bytes,
            ));
        }
        store.atomic_batch_write(batch)?;

        debug!(user_id = %user.id, address = %user.address, "User inserted");
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Self::load(&self.store.read(), &id)
    }

    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, RepositoryError> {
        Self::find(&self.store.read(), &filter)
    }

    async fn find_one_and_update(
        &self,
        filter: UserFilter,
        patch: UserPatch,
    ) -> Result<User, RepositoryError> {
        let mut store = self.store.write();

        let Some(mut user) = Self::find(&store, &filter)? else {
            return Err(RepositoryError::NotFound {
                field: filter.field(),
                value: filter.value().to_string(),
            });
        };

        let mut batch = Vec::new();
        if let Some(new_twitter_id) = patch.twitter_id {
            if user.twitter_id.as_deref() != Some(new_twitter_id.as_str()) {
                let new_index = UserFilter::TwitterId(new_twitter_id.clone());
                if Self::resolve(&store, &new_index)?.is_some_and(|owner| owner != user.id) {
                    return Err(RepositoryError::DuplicateTwitterId(new_twitter_id));
                }
                if let Some(old) = user.twitter_id.take() {
                    batch.push(BatchOperation::delete(index_key(&UserFilter::TwitterId(old))));
                }
                batch.push(BatchOperation::put(
                    index_key(&new_index),
                    user.id.to_string().into_bytes(),
                ));
                user.twitter_id = Some(new_twitter_id);
            }
        }

        user.updated_at = self.time_source.now();
        batch.push(BatchOperation::put(user_key(&user.id), serde_json::to_vec(&user)?));
        store.atomic_batch_write(batch)?;

        debug!(user_id = %user.id, "User updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::KVStoreError;
    use crate::ports::outbound::InMemoryKVStore;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock that advances one second per reading.
    struct TickingTime(AtomicU64);

    impl TimeSource for TickingTime {
        fn now(&self) -> u64 {
            self.0.fetch_add(1, Ordering::Relaxed)
        }
    }

    fn stored_users<KV: KeyValueStore>(repo: &KvUserRepository<KV>) -> usize {
        repo.store
            .read()
            .prefix_scan(USER_PREFIX.as_bytes())
            .unwrap()
            .len()
    }

    fn repo() -> KvUserRepository<InMemoryKVStore> {
        KvUserRepository::with_time_source(
            InMemoryKVStore::new(),
            Arc::new(TickingTime(AtomicU64::new(1_000))),
        )
    }

    #[tokio::test]
    async fn test_insert_then_find_by_every_key() {
        let repo = repo();
        let user = repo
            .insert(NewUser::new("0xabc").with_twitter_id("42"))
            .await
            .unwrap();

        assert_eq!(repo.find_by_id(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.find_one(UserFilter::Address("0xabc".into())).await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            repo.find_one(UserFilter::TwitterId("42".into())).await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(stored_users(&repo), 1);
    }

    #[tokio::test]
    async fn test_missing_lookups_are_none() {
        let repo = repo();
        assert_eq!(repo.find_by_id(UserId::new()).await.unwrap(), None);
        assert_eq!(
            repo.find_one(UserFilter::Address("0xnone".into())).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_duplicate_address_rejected() {
        let repo = repo();
        let original = repo.insert(NewUser::new("0xabc")).await.unwrap();

        let err = repo
            .insert(NewUser::new("0xabc").with_twitter_id("7"))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateAddress("0xabc".into()));

        assert_eq!(repo.find_by_id(original.id).await.unwrap(), Some(original));
        assert_eq!(
            repo.find_one(UserFilter::TwitterId("7".into())).await.unwrap(),
            None
        );
        assert_eq!(stored_users(&repo), 1);
    }

    #[tokio::test]
    async fn test_duplicate_twitter_id_rejected_on_insert() {
        let repo = repo();
        repo.insert(NewUser::new("0xa").with_twitter_id("42"))
            .await
            .unwrap();

        let err = repo
            .insert(NewUser::new("0xb").with_twitter_id("42"))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateTwitterId("42".into()));
    }

    #[tokio::test]
    async fn test_update_moves_twitter_index() {
        let repo = repo();
        let user = repo
            .insert(NewUser::new("0xabc").with_twitter_id("old"))
            .await
            .unwrap();

        let updated = repo
            .find_one_and_update(UserFilter::Address("0xabc".into()), UserPatch::twitter_id("new"))
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.twitter_id.as_deref(), Some("new"));
        assert!(updated.updated_at > user.updated_at);
        assert_eq!(
            repo.find_one(UserFilter::TwitterId("old".into())).await.unwrap(),
            None
        );
        assert_eq!(
            repo.find_one(UserFilter::TwitterId("new".into())).await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo();
        let err = repo
            .find_one_and_update(UserFilter::Address("0xnone".into()), UserPatch::twitter_id("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { field: "address", .. }));
        assert_eq!(stored_users(&repo), 0);
    }

    #[tokio::test]
    async fn test_update_to_taken_twitter_id_changes_nothing() {
        let repo = repo();
        let alice = repo
            .insert(NewUser::new("0xa").with_twitter_id("alice"))
            .await
            .unwrap();
        let bob = repo
            .insert(NewUser::new("0xb").with_twitter_id("bob"))
            .await
            .unwrap();

        let err = repo
            .find_one_and_update(UserFilter::Address("0xb".into()), UserPatch::twitter_id("alice"))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateTwitterId("alice".into()));

        assert_eq!(repo.find_by_id(alice.id).await.unwrap(), Some(alice));
        assert_eq!(repo.find_by_id(bob.id).await.unwrap(), Some(bob.clone()));
        assert_eq!(
            repo.find_one(UserFilter::TwitterId("bob".into())).await.unwrap(),
            Some(bob)
        );
    }

    #[tokio::test]
    async fn test_relinking_same_twitter_id_is_allowed() {
        let repo = repo();
        repo.insert(NewUser::new("0xa").with_twitter_id("42"))
            .await
            .unwrap();

        let updated = repo
            .find_one_and_update(UserFilter::Address("0xa".into()), UserPatch::twitter_id("42"))
            .await
            .unwrap();
        assert_eq!(updated.twitter_id.as_deref(), Some("42"));
    }

    /// Store whose batch writes always fail.
    #[derive(Default)]
    struct FailingBatchStore(InMemoryKVStore);

    impl KeyValueStore for FailingBatchStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
            self.0.get(key)
        }
        fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
            self.0.put(key, value)
        }
        fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
            self.0.delete(key)
        }
        fn atomic_batch_write(&mut self, _: Vec<BatchOperation>) -> Result<(), KVStoreError> {
            Err(KVStoreError::Io {
                message: "disk full".into(),
            })
        }
        fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
            self.0.exists(key)
        }
        fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
            self.0.prefix_scan(prefix)
        }
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let repo = KvUserRepository::new(FailingBatchStore::default());
        let err = repo.insert(NewUser::new("0xabc")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
        assert_eq!(stored_users(&repo), 0);
    }
}
