//! Main verification service implementation

use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing;

use mg_shared::utils::email::{is_valid_code_format, mask_email};

use crate::domain::entities::verification_record::{CodeState, VerificationRecord};
use crate::errors::{DomainResult, VerificationError};
use crate::repositories::verification::VerificationRepository;

use super::config::VerificationServiceConfig;
use super::traits::CodeSenderTrait;
use super::types::{IssuedCode, SendCodeResult, VerifyOutcome};

/// Verification service for issuing and validating email codes
pub struct VerificationService<R: VerificationRepository, S: CodeSenderTrait> {
    /// Record store
    repository: Arc<R>,
    /// Delivery channel for issued codes
    sender: Arc<S>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<R: VerificationRepository, S: CodeSenderTrait> VerificationService<R, S> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `repository` - Record store implementation
    /// * `sender` - Code delivery implementation
    /// * `config` - Service configuration
    pub fn new(repository: Arc<R>, sender: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self {
            repository,
            sender,
            config,
        }
    }

    /// Issue a new verification code for an address
    ///
    /// This method:
    /// 1. Enforces the per-address issuance quota (sliding window derived
    ///    from stored record timestamps)
    /// 2. Supersedes every prior active code for the address
    /// 3. Generates and persists a fresh code
    ///
    /// The caller is responsible for handing the returned plaintext code
    /// to a sender; `send_code` does both steps in one call.
    ///
    /// # Errors
    ///
    /// * `VerificationError::QuotaExceeded` - quota hit, nothing created
    /// * `DomainError::Storage` - persistence failure
    pub async fn issue(&self, email: &str) -> DomainResult<IssuedCode> {
        let window = Duration::minutes(self.config.issue_window_minutes);
        let issued_in_window = self
            .repository
            .count_issued_since(email, Utc::now() - window)
            .await?;

        if issued_in_window >= self.config.issue_limit_per_window {
            tracing::warn!(
                email = %mask_email(email),
                issued_in_window,
                event = "issue_quota_exceeded",
                "Verification code issuance quota exceeded"
            );
            return Err(VerificationError::QuotaExceeded {
                retry_after_minutes: self.config.issue_window_minutes,
            }
            .into());
        }

        // Only the newest code may be valid for an address
        let superseded = self.repository.supersede_active(email).await?;
        if superseded > 0 {
            tracing::info!(
                email = %mask_email(email),
                superseded,
                event = "codes_superseded",
                "Superseded prior active verification codes"
            );
        }

        let record = VerificationRecord::new_with_expiration(
            email.to_string(),
            self.config.code_expiration_minutes,
        );

        let record = match self.repository.create(record).await {
            Ok(record) => record,
            Err(e) => {
                // The supersede step already committed, so the address is
                // left with zero active codes until the next issuance.
                tracing::error!(
                    email = %mask_email(email),
                    error = %e,
                    event = "issue_create_failed",
                    "Failed to persist verification code after superseding prior codes"
                );
                return Err(e);
            }
        };

        tracing::info!(
            email = %mask_email(email),
            record_id = %record.id,
            event = "code_issued",
            "Issued new verification code"
        );

        Ok(IssuedCode {
            record_id: record.id,
            code: record.code,
            expires_at: record.expires_at,
        })
    }

    /// Issue a verification code and deliver it to the address
    ///
    /// Delivery failure surfaces as `VerificationError::DeliveryFailed`,
    /// distinct from quota and storage errors; the persisted record is NOT
    /// rolled back and remains usable should the message arrive late or
    /// the caller retry delivery.
    pub async fn send_code(&self, email: &str) -> DomainResult<SendCodeResult> {
        let issued = self.issue(email).await?;

        let message_id = match self.sender.send_code(email, &issued.code).await {
            Ok(message_id) => message_id,
            Err(e) => {
                tracing::error!(
                    email = %mask_email(email),
                    record_id = %issued.record_id,
                    error = %e,
                    event = "code_delivery_failed",
                    "Failed to deliver verification code"
                );
                return Err(VerificationError::DeliveryFailed.into());
            }
        };

        tracing::info!(
            email = %mask_email(email),
            record_id = %issued.record_id,
            message_id = %message_id,
            event = "code_delivered",
            "Delivered verification code"
        );

        Ok(SendCodeResult {
            record_id: issued.record_id,
            message_id,
            expires_at: issued.expires_at,
        })
    }

    /// Validate a submitted code against the latest active record
    ///
    /// Every path that touches a record persists a state change; only
    /// `NotFound` and `InvalidFormat` leave the store untouched. The
    /// attempt counter is incremented and persisted BEFORE the comparison,
    /// so a correct code still consumes its attempt slot (moot on success,
    /// since success consumes the whole record).
    pub async fn verify(&self, email: &str, submitted_code: &str) -> DomainResult<VerifyOutcome> {
        if !is_valid_code_format(submitted_code) {
            tracing::warn!(
                email = %mask_email(email),
                code_length = submitted_code.len(),
                event = "invalid_code_format",
                "Rejected verification code with invalid format"
            );
            return Ok(VerifyOutcome::InvalidFormat);
        }

        let mut record = match self.repository.find_latest_active(email).await? {
            Some(record) => record,
            None => return Ok(VerifyOutcome::NotFound),
        };

        // Lazy expiry: the first validation to meet a stale record retires it
        if record.is_expired() {
            record.state = CodeState::Expired;
            self.repository.update(&record).await?;
            tracing::info!(
                email = %mask_email(email),
                record_id = %record.id,
                event = "code_expired",
                "Verification code expired before use"
            );
            return Ok(VerifyOutcome::Expired);
        }

        // Limit reached on a previous call; no further increment
        if record.attempts >= self.config.max_attempts {
            record.state = CodeState::Exhausted;
            self.repository.update(&record).await?;
            tracing::warn!(
                email = %mask_email(email),
                record_id = %record.id,
                event = "attempts_exhausted",
                "Verification attempt limit exhausted"
            );
            return Ok(VerifyOutcome::AttemptsExhausted);
        }

        // The attempt is counted before the comparison, success included
        record.attempts += 1;
        self.repository.update(&record).await?;

        if Self::codes_match(&record.code, submitted_code) {
            record.state = CodeState::Succeeded;
            self.repository.update(&record).await?;
            tracing::info!(
                email = %mask_email(email),
                record_id = %record.id,
                event = "code_verified",
                "Verification code accepted"
            );
            Ok(VerifyOutcome::Success)
        } else {
            let attempts_remaining = self.config.max_attempts - record.attempts;
            tracing::warn!(
                email = %mask_email(email),
                record_id = %record.id,
                attempts_remaining,
                event = "code_mismatch",
                "Verification code mismatch"
            );
            Ok(VerifyOutcome::Mismatch { attempts_remaining })
        }
    }

    /// Check whether an unexpired active code is outstanding for an address
    ///
    /// Pure read; used by the resend flow to block a duplicate issuance
    /// while a code is still live. This is policy layered on top of the
    /// issuance quota, not a replacement for it.
    pub async fn has_active_code(&self, email: &str) -> DomainResult<bool> {
        Ok(self
            .repository
            .find_latest_active(email)
            .await?
            .map(|record| !record.is_expired())
            .unwrap_or(false))
    }

    /// Compare a stored code against a submitted code in constant time
    ///
    /// Exact string equality; the constant-time walk only removes the
    /// timing side channel.
    fn codes_match(stored: &str, submitted: &str) -> bool {
        stored.len() == submitted.len()
            && constant_time_eq(stored.as_bytes(), submitted.as_bytes())
    }
}
