//! # Domain Layer
//!
//! Account payloads, errors and request validation. No I/O.

pub mod entities;
pub mod errors;
pub mod validation;
