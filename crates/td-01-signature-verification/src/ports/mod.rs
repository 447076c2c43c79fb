//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that external callers use
//!
//! Recovery is pure computation, so this subsystem has no driven ports.

pub mod inbound;
