//! Verification code lifecycle configuration

use serde::{Deserialize, Serialize};

/// Settings governing issuance and validation of verification codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Minutes before an issued code expires
    #[serde(default = "default_expiration_minutes")]
    pub code_expiration_minutes: i64,

    /// Maximum failed validation attempts per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,

    /// Maximum codes issued per address within the quota window
    #[serde(default = "default_issue_limit")]
    pub issue_limit_per_window: i64,

    /// Quota window in minutes (trailing, derived from stored history)
    #[serde(default = "default_issue_window_minutes")]
    pub issue_window_minutes: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: default_expiration_minutes(),
            max_attempts: default_max_attempts(),
            issue_limit_per_window: default_issue_limit(),
            issue_window_minutes: default_issue_window_minutes(),
        }
    }
}

fn default_expiration_minutes() -> i64 {
    15
}

fn default_max_attempts() -> i32 {
    5
}

fn default_issue_limit() -> i64 {
    3
}

fn default_issue_window_minutes() -> i64 {
    60
}
