//! # Metering Decorators
//!
//! Wrap service ports so the account crate stays free of telemetry.
//!
//! - [`MeteredAccounts`]: counts errors returned to callers, by kind
//! - [`MeteredRepository`]: counts users created and updated
//! - [`MeteredPublisher`]: counts events published with no subscriber

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared_bus::{AccountEvent, EventPublisher};
use shared_types::{User, UserId};
use td_02_user_accounts::{
    AccountError, NewUser, RepositoryError, UserAccountApi, UserFilter, UserPatch, UserRepository,
};
use trustdrops_telemetry::{
    metric_inc, ACCOUNT_ERRORS, EVENTS_DROPPED, USERS_CREATED, USERS_UPDATED,
};

/// Inbound decorator recording every `AccountError` handed to a caller.
pub struct MeteredAccounts {
    inner: Arc<dyn UserAccountApi>,
}

impl MeteredAccounts {
    pub fn new(inner: Arc<dyn UserAccountApi>) -> Self {
        Self { inner }
    }
}

fn record<T>(result: Result<T, AccountError>) -> Result<T, AccountError> {
    if let Err(e) = &result {
        metric_inc!(ACCOUNT_ERRORS, &[e.kind()]);
    }
    result
}

#[async_trait]
impl UserAccountApi for MeteredAccounts {
    async fn create(&self, user: NewUser) -> Result<User, AccountError> {
        record(self.inner.create(user).await)
    }

    async fn read_by_id(&self, id: &str) -> Option<User> {
        self.inner.read_by_id(id).await
    }

    async fn read(&self, address: &str) -> Option<User> {
        self.inner.read(address).await
    }

    async fn read_by_twitter_id(&self, twitter_id: &str) -> Option<User> {
        self.inner.read_by_twitter_id(twitter_id).await
    }

    async fn update(&self, user: &User, patch: UserPatch) -> Result<bool, AccountError> {
        record(self.inner.update(user, patch).await)
    }

    async fn is_signature_valid(&self, address: &str, signature: &str) -> bool {
        self.inner.is_signature_valid(address, signature).await
    }

    async fn queue_approval(&self, user: &User) {
        self.inner.queue_approval(user).await
    }

    async fn link_account(&self, body: &Value) -> Result<User, AccountError> {
        record(self.inner.link_account(body).await)
    }
}

/// Repository decorator recording write metrics.
pub struct MeteredRepository {
    inner: Arc<dyn UserRepository>,
}

impl MeteredRepository {
    pub fn new(inner: Arc<dyn UserRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl UserRepository for MeteredRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let created = self.inner.insert(user).await?;
        metric_inc!(USERS_CREATED);
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>, RepositoryError> {
        self.inner.find_one(filter).await
    }

    async fn find_one_and_update(
        &self,
        filter: UserFilter,
        patch: UserPatch,
    ) -> Result<User, RepositoryError> {
        let updated = self.inner.find_one_and_update(filter, patch).await?;
        metric_inc!(USERS_UPDATED);
        Ok(updated)
    }
}

/// Publisher decorator counting undelivered events.
pub struct MeteredPublisher<P: EventPublisher + ?Sized> {
    inner: Arc<P>,
}

impl<P: EventPublisher + ?Sized> MeteredPublisher<P> {
    pub fn new(inner: Arc<P>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for MeteredPublisher<P> {
    async fn publish(&self, event: AccountEvent) -> usize {
        let receivers = self.inner.publish(event).await;
        if receivers == 0 {
            metric_inc!(EVENTS_DROPPED, &["no_subscriber"]);
        }
        receivers
    }

    fn events_published(&self) -> u64 {
        self.inner.events_published()
    }
}
