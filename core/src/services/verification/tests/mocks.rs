//! Mock implementations for testing the verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::verification::traits::CodeSenderTrait;

// Mock code sender for testing
pub struct MockCodeSender {
    pub sent_messages: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockCodeSender {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    pub fn sent_code(&self, email: &str) -> Option<String> {
        self.sent_messages.lock().unwrap().get(email).cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }
}

#[async_trait]
impl CodeSenderTrait for MockCodeSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("smtp relay unavailable".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .insert(email.to_string(), code.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}
