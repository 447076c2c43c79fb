//! # Integration Tests
//!
//! Real signatures, real repository, real event bus. Only the external
//! transaction queue is replaced by a recording gateway.

pub mod fixtures;

mod flows;
mod properties;
mod signatures;
