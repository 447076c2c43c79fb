//! # User Account Service
//!
//! Application service implementing [`UserAccountApi`].
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`UserAccountApi`)
//! - Persists through `UserRepository`
//! - Checks login signatures through `SignatureVerifier`
//! - Dispatches approvals through `ApprovalQueue`
//!
//! The service holds no mutable state; concurrent calls rely on the
//! repository's per-call atomicity.

use crate::domain::entities::{NewUser, SignatureCheck, UserFilter, UserPatch};
use crate::domain::errors::{AccountError, USER_NOT_CREATED, USER_NOT_UPDATED};
use crate::domain::validation::LinkAccountRequest;
use crate::ports::inbound::UserAccountApi;
use crate::ports::outbound::{ApprovalQueue, LinkNotifier, SignatureVerifier, UserRepository};
use async_trait::async_trait;
use serde_json::Value;
use shared_types::{User, UserId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Challenge text clients sign to prove wallet ownership.
pub const DEFAULT_LOGIN_CHALLENGE: &str = "Trustdrops login";

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountServiceConfig {
    /// The message a login signature must cover.
    ///
    /// Fixed text with no nonce or expiry, so a captured signature stays
    /// valid for its address indefinitely.
    pub login_challenge: String,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            login_challenge: DEFAULT_LOGIN_CHALLENGE.to_string(),
        }
    }
}

/// Dependencies for [`UserAccountService`].
pub struct AccountServiceDependencies {
    pub repository: Arc<dyn UserRepository>,
    pub verifier: Arc<dyn SignatureVerifier>,
    pub approvals: Arc<dyn ApprovalQueue>,
    /// Optional listener for successful links.
    pub notifier: Option<Arc<dyn LinkNotifier>>,
}

/// The User Account Service.
pub struct UserAccountService {
    repository: Arc<dyn UserRepository>,
    verifier: Arc<dyn SignatureVerifier>,
    approvals: Arc<dyn ApprovalQueue>,
    notifier: Option<Arc<dyn LinkNotifier>>,
    config: AccountServiceConfig,
}

impl UserAccountService {
    /// Create the service with the default configuration.
    pub fn new(deps: AccountServiceDependencies) -> Self {
        Self::with_config(deps, AccountServiceConfig::default())
    }

    /// Create the service with an explicit configuration.
    pub fn with_config(deps: AccountServiceDependencies, config: AccountServiceConfig) -> Self {
        Self {
            repository: deps.repository,
            verifier: deps.verifier,
            approvals: deps.approvals,
            notifier: deps.notifier,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AccountServiceConfig {
        &self.config
    }

    /// Check a login signature, keeping the reason for a denial.
    pub fn check_signature(&self, address: &str, signature: &str) -> SignatureCheck {
        match self
            .verifier
            .recover_signer(&self.config.login_challenge, signature)
        {
            // Exact string comparison: the claimed address must be in the
            // checksummed form the verifier produces.
            Ok(signer) if signer == address => SignatureCheck::Valid { signer },
            Ok(recovered) => SignatureCheck::Mismatch { recovered },
            Err(e) => SignatureCheck::Failed {
                reason: e.reason,
            },
        }
    }

    async fn find(&self, filter: UserFilter) -> Option<User> {
        debug!(field = filter.field(), value = filter.value(), "Reading user");
        match self.repository.find_one(filter).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, "User lookup failed");
                None
            }
        }
    }

    async fn apply_update(&self, address: &str, patch: UserPatch) -> Result<User, AccountError> {
        self.repository
            .find_one_and_update(UserFilter::Address(address.to_string()), patch)
            .await
            .map_err(|e| {
                error!(address, error = %e, "User update failed");
                AccountError::validation(USER_NOT_UPDATED)
            })
    }
}

#[async_trait]
impl UserAccountApi for UserAccountService {
    async fn create(&self, user: NewUser) -> Result<User, AccountError> {
        let address = user.address.clone();
        match self.repository.insert(user).await {
            Ok(created) => {
                info!(user_id = %created.id, address = %created.address, "User created");
                Ok(created)
            }
            Err(e) => {
                error!(address = %address, error = %e, "User creation failed");
                Err(AccountError::validation(USER_NOT_CREATED))
            }
        }
    }

    async fn read_by_id(&self, id: &str) -> Option<User> {
        debug!(id, "Reading user by id");
        let Ok(user_id) = id.parse::<UserId>() else {
            debug!(id, "Malformed user id");
            return None;
        };
        match self.repository.find_by_id(user_id).await {
            Ok(user) => user,
            Err(e) => {
                error!(id, error = %e, "User lookup failed");
                None
            }
        }
    }

    async fn read(&self, address: &str) -> Option<User> {
        self.find(UserFilter::Address(address.to_string())).await
    }

    async fn read_by_twitter_id(&self, twitter_id: &str) -> Option<User> {
        self.find(UserFilter::TwitterId(twitter_id.to_string()))
            .await
    }

    async fn update(&self, user: &User, patch: UserPatch) -> Result<bool, AccountError> {
        let updated = self.apply_update(&user.address, patch).await?;
        info!(user_id = %updated.id, "User updated");
        Ok(true)
    }

    async fn is_signature_valid(&self, address: &str, signature: &str) -> bool {
        match self.check_signature(address, signature) {
            SignatureCheck::Valid { .. } => true,
            SignatureCheck::Mismatch { recovered } => {
                debug!(address, recovered = %recovered, "Signature from another address");
                false
            }
            SignatureCheck::Failed { reason } => {
                error!(address, reason = %reason, "Signature verification failed");
                false
            }
        }
    }

    async fn queue_approval(&self, user: &User) {
        if let Err(e) = self.approvals.queue_approval_transaction(user).await {
            warn!(user_id = %user.id, error = %e, "Approval dispatch failed");
        }
    }

    async fn link_account(&self, body: &Value) -> Result<User, AccountError> {
        let request = LinkAccountRequest::from_json(body)?;

        if !self
            .is_signature_valid(&request.address, &request.signature)
            .await
        {
            return Err(AccountError::InvalidSignature);
        }

        if let Some(owner) = self.read_by_twitter_id(&request.user_id).await {
            if owner.address != request.address {
                warn!(
                    twitter_id = %request.user_id,
                    owner = %owner.address,
                    claimant = %request.address,
                    "Twitter account already linked elsewhere"
                );
                return Err(AccountError::AlreadyLinked);
            }
        }

        let user = match self.read(&request.address).await {
            None => {
                self.create(NewUser::new(&request.address).with_twitter_id(&request.user_id))
                    .await?
            }
            Some(existing) => {
                let updated = self
                    .apply_update(&existing.address, UserPatch::twitter_id(&request.user_id))
                    .await?;
                info!(user_id = %updated.id, "User updated");
                updated
            }
        };

        self.queue_approval(&user).await;
        if let Some(notifier) = &self.notifier {
            notifier.account_linked(&user).await;
        }

        info!(
            user_id = %user.id,
            address = %user.address,
            twitter_id = %request.user_id,
            "Account linked"
        );
        Ok(user)
    }
}
