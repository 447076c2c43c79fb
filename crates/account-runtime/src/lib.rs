//! # Account Runtime Library
//!
//! Exposes the runtime's modules for testing. The entry point is the
//! `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and the service container
//! - `adapters/` - port implementations (storage, signer recovery, metering, queue)
//! - `handlers/` - event bus consumers
//! - `runtime` - startup and graceful shutdown

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod runtime;

pub use container::{AppConfig, ConfigError, ServiceContainer};
pub use runtime::AccountRuntime;
