//! # Trustdrops Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── fixtures.rs    # Wallets, signed challenges, wired services
//! │   ├── signatures.rs  # TD-01 vectors and malleability
//! │   ├── properties.rs  # Account service guarantees
//! │   └── flows.rs       # Link flow through the runtime
//! └── benches/
//!     └── signature_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p td-tests
//! cargo test -p td-tests integration::flows
//! cargo bench -p td-tests
//! ```

pub mod integration;
