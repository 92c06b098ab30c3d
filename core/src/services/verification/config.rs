//! Configuration for the verification service

use mg_shared::config::VerificationConfig;

use crate::domain::entities::verification_record::{DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of failed validation attempts allowed per code
    pub max_attempts: i32,
    /// Maximum codes issued per address within the quota window
    pub issue_limit_per_window: i64,
    /// Trailing quota window in minutes
    pub issue_window_minutes: i64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            issue_limit_per_window: 3,
            issue_window_minutes: 60,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(settings: &VerificationConfig) -> Self {
        Self {
            code_expiration_minutes: settings.code_expiration_minutes,
            max_attempts: settings.max_attempts,
            issue_limit_per_window: settings.issue_limit_per_window,
            issue_window_minutes: settings.issue_window_minutes,
        }
    }
}
