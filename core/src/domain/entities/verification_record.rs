//! Verification record entity for email-based verification.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of failed validation attempts allowed per code
pub const MAX_ATTEMPTS: i32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (15 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 15;

/// Lifecycle state of a verification record.
///
/// A record is *consumed* in every state except `Active`; the variant
/// records why it stopped being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeState {
    /// Issued and not yet consumed
    Active,
    /// The submitted code matched
    Succeeded,
    /// Validation encountered the record after its expiry passed
    Expired,
    /// The attempt limit was reached
    Exhausted,
    /// A newer code was issued for the same address
    Superseded,
}

impl CodeState {
    /// Whether the record is no longer usable for verification
    pub fn is_consumed(&self) -> bool {
        !matches!(self, CodeState::Active)
    }

    /// Stable string form used by the persistence layer
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeState::Active => "active",
            CodeState::Succeeded => "succeeded",
            CodeState::Expired => "expired",
            CodeState::Exhausted => "exhausted",
            CodeState::Superseded => "superseded",
        }
    }

    /// Parse the persistence-layer string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(CodeState::Active),
            "succeeded" => Some(CodeState::Succeeded),
            "expired" => Some(CodeState::Expired),
            "exhausted" => Some(CodeState::Exhausted),
            "superseded" => Some(CodeState::Superseded),
            _ => None,
        }
    }
}

/// One issued verification code bound to an email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Email address this code was issued for
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Number of validation attempts counted against this record
    pub attempts: i32,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer acceptable
    pub expires_at: DateTime<Utc>,

    /// Lifecycle state
    pub state: CodeState,
}

impl VerificationRecord {
    /// Creates a new active record with a random 6-digit code and the
    /// default expiration.
    pub fn new(email: String) -> Self {
        Self::new_with_expiration(email, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Creates a new active record with a custom expiration time.
    ///
    /// # Arguments
    ///
    /// * `email` - The address the code is issued for
    /// * `expiration_minutes` - Number of minutes until the code expires
    pub fn new_with_expiration(email: String, expiration_minutes: i64) -> Self {
        let code = Self::generate_code();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(expiration_minutes);

        Self {
            id: Uuid::new_v4(),
            email,
            code,
            attempts: 0,
            created_at: now,
            expires_at,
            state: CodeState::Active,
        }
    }

    /// Generates a random 6-digit code using the OS CSPRNG.
    ///
    /// The code is drawn uniformly from 100000..=999999 so it can never
    /// render with fewer than six digits.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let code: u32 = rng.gen_range(100_000..=999_999);
        code.to_string()
    }

    /// Checks if the record's expiry timestamp has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the record can still accept a verification attempt.
    ///
    /// A record is usable if it is `Active` and not past its expiry.
    /// An `Active` record whose expiry has passed is unusable even though
    /// its stored state has not been rewritten yet; validation lazily
    /// transitions it to `Expired` on first contact.
    pub fn is_usable(&self) -> bool {
        self.state == CodeState::Active && !self.is_expired()
    }

    /// Gets the number of remaining validation attempts (0 if exhausted)
    pub fn remaining_attempts(&self) -> i32 {
        (MAX_ATTEMPTS - self.attempts).max(0)
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let email = "user@example.com".to_string();
        let record = VerificationRecord::new(email.clone());

        assert_eq!(record.email, email);
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.state, CodeState::Active);
        assert!(!record.is_expired());
        assert!(record.is_usable());
    }

    #[test]
    fn test_generate_code_format() {
        for _ in 0..100 {
            let code = VerificationRecord::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let num: u32 = code.parse().expect("generated code should be numeric");
            assert!((100_000..=999_999).contains(&num));
        }
    }

    #[test]
    fn test_code_uniqueness() {
        let codes: Vec<String> = (0..100)
            .map(|_| VerificationRecord::generate_code())
            .collect();

        // Extremely unlikely to collapse to a single value
        let unique_count = codes.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique_count > 1);
    }

    #[test]
    fn test_custom_expiration() {
        let record =
            VerificationRecord::new_with_expiration("user@example.com".to_string(), 30);

        let expected = record.created_at + Duration::minutes(30);
        assert_eq!(record.expires_at, expected);
    }

    #[test]
    fn test_expired_record_is_not_usable() {
        let mut record = VerificationRecord::new("user@example.com".to_string());
        record.expires_at = Utc::now() - Duration::seconds(1);

        assert!(record.is_expired());
        assert!(!record.is_usable());
        assert_eq!(record.time_until_expiration(), Duration::zero());
        // State is still Active until validation touches it
        assert_eq!(record.state, CodeState::Active);
    }

    #[test]
    fn test_consumed_states() {
        assert!(!CodeState::Active.is_consumed());
        assert!(CodeState::Succeeded.is_consumed());
        assert!(CodeState::Expired.is_consumed());
        assert!(CodeState::Exhausted.is_consumed());
        assert!(CodeState::Superseded.is_consumed());
    }

    #[test]
    fn test_state_round_trip() {
        for state in [
            CodeState::Active,
            CodeState::Succeeded,
            CodeState::Expired,
            CodeState::Exhausted,
            CodeState::Superseded,
        ] {
            assert_eq!(CodeState::parse(state.as_str()), Some(state));
        }
        assert_eq!(CodeState::parse("verified"), None);
    }

    #[test]
    fn test_remaining_attempts() {
        let mut record = VerificationRecord::new("user@example.com".to_string());
        assert_eq!(record.remaining_attempts(), MAX_ATTEMPTS);

        record.attempts = 3;
        assert_eq!(record.remaining_attempts(), 2);

        record.attempts = MAX_ATTEMPTS;
        assert_eq!(record.remaining_attempts(), 0);
    }

    #[test]
    fn test_serialization() {
        let record = VerificationRecord::new("user@example.com".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: VerificationRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
