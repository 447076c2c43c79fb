//! # Shared Types Crate
//!
//! Entities that cross subsystem boundaries: the `User` document persisted by
//! the account service and carried by approval events on the shared bus.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The user document shape is defined here once.
//! - **Opaque Identity**: `UserId` is assigned at creation and never changes.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
