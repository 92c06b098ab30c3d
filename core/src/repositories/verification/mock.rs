//! Mock implementation of VerificationRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_record::{CodeState, VerificationRecord};
use crate::errors::DomainError;

use super::r#trait::VerificationRepository;

/// In-memory verification repository for tests and single-node development
pub struct MockVerificationRepository {
    records: Arc<RwLock<Vec<VerificationRecord>>>,
    fail_writes: bool,
}

impl MockVerificationRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_writes: false,
        }
    }

    /// Create a mock whose write operations fail with a storage error
    pub fn failing() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_writes: true,
        }
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Fetch a record by id (test helper)
    pub async fn get(&self, id: Uuid) -> Option<VerificationRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// All records for an address, newest first (test helper)
    pub async fn records_for(&self, email: &str) -> Vec<VerificationRecord> {
        let mut records: Vec<VerificationRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    fn storage_error() -> DomainError {
        DomainError::Storage {
            message: "mock repository write failure".to_string(),
        }
    }
}

impl Default for MockVerificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationRepository for MockVerificationRepository {
    async fn create(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationRecord, DomainError> {
        if self.fail_writes {
            return Err(Self::storage_error());
        }
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn find_latest_active(
        &self,
        email: &str,
    ) -> Result<Option<VerificationRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.email == email && r.state == CodeState::Active)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.email == email && r.created_at >= since)
            .count() as i64)
    }

    async fn supersede_active(&self, email: &str) -> Result<u64, DomainError> {
        if self.fail_writes {
            return Err(Self::storage_error());
        }
        let mut records = self.records.write().await;
        let mut count = 0;
        for record in records.iter_mut() {
            if record.email == email && record.state == CodeState::Active {
                record.state = CodeState::Superseded;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update(&self, record: &VerificationRecord) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(Self::storage_error());
        }
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(DomainError::Storage {
                message: format!("no record with id {}", record.id),
            }),
        }
    }

    async fn purge_dead(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        if self.fail_writes {
            return Err(Self::storage_error());
        }
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !r.state.is_consumed() && r.expires_at > now);
        Ok((before - records.len()) as u64)
    }
}
