//! # Event Handlers
//!
//! Long-running consumers of the shared event bus.

pub mod approval;

pub use approval::{ApprovalHandler, ApprovalStats};
