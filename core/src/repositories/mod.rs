//! Repository interfaces (ports) for persistence.
//!
//! Implementations live in the infrastructure crate; an in-memory mock is
//! provided here for tests and single-node development.

pub mod verification;

pub use verification::{MockVerificationRepository, VerificationRepository};
