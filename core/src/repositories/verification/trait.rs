//! Verification repository trait defining the interface for record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;

/// Repository trait for VerificationRecord persistence operations
///
/// This trait defines the contract for managing verification records in the
/// record store. Each method maps to a single store round trip; atomicity is
/// expected at single-record-update granularity only, which is what keeps
/// the cleanup sweep safe against concurrent validation updates.
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Persist a new record
    ///
    /// # Arguments
    /// * `record` - The record to persist, already in its initial state
    ///
    /// # Returns
    /// * `Ok(VerificationRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed
    async fn create(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationRecord, DomainError>;

    /// Find the most recently created `Active` record for an address
    ///
    /// Consumed records are never returned, regardless of their expiry.
    async fn find_latest_active(
        &self,
        email: &str,
    ) -> Result<Option<VerificationRecord>, DomainError>;

    /// Count records created for an address at or after `since`
    ///
    /// Used to derive the issuance quota from persisted history; counts
    /// every record in the window whether or not it has been consumed.
    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, DomainError>;

    /// Mark every `Active` record for an address as `Superseded`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records transitioned
    async fn supersede_active(&self, email: &str) -> Result<u64, DomainError>;

    /// Persist the current attempts counter and state of a record
    async fn update(&self, record: &VerificationRecord) -> Result<(), DomainError>;

    /// Delete every record that is consumed or whose expiry is at or
    /// before `now`
    ///
    /// Maintenance only; never called on the request path.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records deleted
    async fn purge_dead(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
