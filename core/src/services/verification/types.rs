//! Types for verification service results

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of issuing a code, before delivery
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Identifier of the persisted record
    pub record_id: Uuid,
    /// The plaintext code, for handing to the sender
    pub code: String,
    /// When the code stops being acceptable
    pub expires_at: DateTime<Utc>,
}

/// Result of issuing and delivering a code
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// Identifier of the persisted record
    pub record_id: Uuid,
    /// The delivery provider's message ID
    pub message_id: String,
    /// When the code stops being acceptable
    pub expires_at: DateTime<Utc>,
}

/// Outcome of a validation call
///
/// Every outcome is a definite answer, not a fault; the same record can
/// produce `Success` at most once. `NotFound` and `Mismatch` deliberately
/// share one user-facing message so callers cannot probe whether a code
/// was ever issued for an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The submitted code matched; the record is now consumed
    Success,
    /// The submitted code did not match; the record stays active
    Mismatch {
        /// Attempts left before exhaustion; 0 on the final mismatch
        /// (the limit itself is enforced as a pre-check on the next call)
        attempts_remaining: i32,
    },
    /// The record's expiry had passed; it is now consumed
    Expired,
    /// The attempt limit was already reached; the record is now consumed
    AttemptsExhausted,
    /// No active record exists for the address
    NotFound,
    /// The submitted code was not six ASCII digits; nothing was touched
    InvalidFormat,
}

impl VerifyOutcome {
    /// Whether verification succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success)
    }

    /// User-facing message for this outcome
    pub fn user_message(&self) -> &'static str {
        match self {
            VerifyOutcome::Success => "Email verified successfully.",
            // Identical wording for a wrong code and a missing code
            VerifyOutcome::Mismatch { .. } | VerifyOutcome::NotFound => {
                "Invalid verification code. Please check the code and try again."
            }
            VerifyOutcome::Expired => {
                "This verification code has expired. Please request a new code."
            }
            VerifyOutcome::AttemptsExhausted => {
                "Too many incorrect attempts. Please request a new code."
            }
            VerifyOutcome::InvalidFormat => "Invalid verification code format.",
        }
    }
}
