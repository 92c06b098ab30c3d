//! Error types for the verification workflow
//!
//! User-facing wording lives in the presentation layer; these variants
//! carry only what handlers need to pick a response. None of them reveal
//! whether an address has an account or how many codes exist for it.

use thiserror::Error;

/// Verification lifecycle errors
///
/// These are operation-could-not-start conditions surfaced by issuance.
/// Validation outcomes are not errors; see `VerifyOutcome`.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Issuance quota exceeded, retry after {retry_after_minutes} minutes")]
    QuotaExceeded { retry_after_minutes: i64 },

    #[error("Verification code delivery failed")]
    DeliveryFailed,

    #[error("A verification code is already outstanding for this address")]
    CodeOutstanding,
}

/// Input validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },
}
