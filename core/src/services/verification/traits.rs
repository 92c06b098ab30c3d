//! Sender trait for verification code delivery

use async_trait::async_trait;

/// Trait for delivering verification codes to an email address
///
/// Implementations own transport concerns (relay selection, retries);
/// the service only distinguishes delivered from failed.
#[async_trait]
pub trait CodeSenderTrait: Send + Sync {
    /// Deliver a verification code
    ///
    /// # Returns
    /// * `Ok(String)` - Provider message identifier for audit logging
    /// * `Err(String)` - Transport error description (logged, not shown
    ///   to callers)
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String>;
}
