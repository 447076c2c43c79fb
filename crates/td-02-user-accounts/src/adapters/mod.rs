//! # Adapters Layer
//!
//! Implementations of the outbound ports.

pub mod bus;
pub mod repository;

pub use bus::BusEventAdapter;
pub use repository::KvUserRepository;
