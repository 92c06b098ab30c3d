//! Mock email sender for development and testing
//!
//! Logs deliveries instead of sending them and records each message so
//! tests can assert on what would have gone out.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

use mg_core::services::verification::CodeSenderTrait;
use mg_shared::utils::email::mask_email;

/// A recorded outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEmail {
    pub to: String,
    pub code: String,
}

/// Mock sender that records messages instead of delivering them
#[derive(Default)]
pub struct MockEmailSender {
    /// Every message handed to the sender, in order
    pub sent: Arc<Mutex<Vec<RecordedEmail>>>,
    /// Whether to simulate delivery failures
    pub simulate_failure: bool,
}

impl MockEmailSender {
    /// Create a mock sender that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock sender that fails every delivery
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: true,
        }
    }

    /// The most recent code sent to an address
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == email)
            .map(|m| m.code.clone())
    }

    /// Total number of recorded messages
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl CodeSenderTrait for MockEmailSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        if self.simulate_failure {
            return Err("simulated delivery failure".to_string());
        }

        self.sent.lock().unwrap().push(RecordedEmail {
            to: email.to_string(),
            code: code.to_string(),
        });

        let message_id = format!("mock-{}", Uuid::new_v4());
        info!(
            email = %mask_email(email),
            message_id = %message_id,
            "Mock sender recorded verification message"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_messages_in_order() {
        let sender = MockEmailSender::new();

        sender.send_code("a@b.com", "111111").await.unwrap();
        sender.send_code("a@b.com", "222222").await.unwrap();

        assert_eq!(sender.sent_count(), 2);
        assert_eq!(sender.last_code_for("a@b.com"), Some("222222".to_string()));
        assert_eq!(sender.last_code_for("other@b.com"), None);
    }

    #[tokio::test]
    async fn failing_sender_rejects_delivery() {
        let sender = MockEmailSender::failing();

        assert!(sender.send_code("a@b.com", "111111").await.is_err());
        assert_eq!(sender.sent_count(), 0);
    }
}
