//! # Storage Adapters
//!
//! Enable the `rocksdb` feature for the persistent backend:
//!
//! ```toml
//! account-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Without it the container falls back to the in-memory store.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore, CF_USERS};

pub use td_02_user_accounts::InMemoryKVStore;
