//! # Service Container
//!
//! Configuration and the container holding every process-lifetime client.
//!
//! - Clients are constructed once, in dependency order, at startup
//! - The service only sees them through its outbound ports

pub mod config;
pub mod services;

pub use config::{AppConfig, ConfigError, StorageConfig, TwitterConfig, TWITTER_SCOPES};
pub use services::{ContainerError, ServiceContainer};
