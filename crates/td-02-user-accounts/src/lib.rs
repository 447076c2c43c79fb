//! # User Accounts Subsystem (TD-02)
//!
//! Identity linking & verification: persists user records, checks that a
//! login signature was produced by the claimed wallet, links a Twitter
//! account to the wallet and dispatches an approval transaction.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): payloads, errors, request validation
//! - **Ports Layer** (`ports/`): `UserAccountApi` inbound; repository,
//!   verifier, approval queue and key-value store outbound
//! - **Adapters Layer** (`adapters/`): key-value repository, event bus adapter
//! - **Service Layer** (`service.rs`): wires domain logic to ports
//!
//! ## Error Surface
//!
//! Callers only ever see [`AccountError`]. Persistence and verification
//! causes are logged, never returned.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{BusEventAdapter, KvUserRepository};
pub use domain::entities::{NewUser, SignatureCheck, UserFilter, UserPatch};
pub use domain::errors::{
    AccountError, KVStoreError, QueueError, RepositoryError, VerifierError, USER_NOT_CREATED,
    USER_NOT_UPDATED,
};
pub use domain::validation::LinkAccountRequest;
pub use ports::inbound::UserAccountApi;
pub use ports::outbound::{
    ApprovalQueue, BatchOperation, InMemoryKVStore, KeyValueStore, LinkNotifier,
    SignatureVerifier, SystemTimeSource, TimeSource, UserRepository,
};
pub use service::{
    AccountServiceConfig, AccountServiceDependencies, UserAccountService,
    DEFAULT_LOGIN_CHALLENGE,
};
