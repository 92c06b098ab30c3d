//! MySQL implementation of the verification record repository
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE verification_codes (
//!     id         CHAR(36)     NOT NULL PRIMARY KEY,
//!     email      VARCHAR(254) NOT NULL,
//!     code       CHAR(6)      NOT NULL,
//!     attempts   INT          NOT NULL DEFAULT 0,
//!     state      VARCHAR(16)  NOT NULL DEFAULT 'active',
//!     created_at DATETIME(3)  NOT NULL,
//!     expires_at DATETIME(3)  NOT NULL,
//!     KEY idx_email_state (email, state),
//!     KEY idx_email_created (email, created_at)
//! );
//! ```
//!
//! Every method is a single statement, so the store's row-level atomicity
//! is the only synchronization between validation updates and the cleanup
//! sweep's deletes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use mg_core::domain::entities::verification_record::{CodeState, VerificationRecord};
use mg_core::errors::DomainError;
use mg_core::repositories::verification::VerificationRepository;
use mg_shared::utils::email::mask_email;

/// MySQL-backed verification record repository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: Pool<MySql>,
}

impl MySqlVerificationRepository {
    /// Create a new repository over an existing pool
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
        DomainError::Storage {
            message: format!("{}: {}", context, e),
        }
    }

    fn record_from_row(row: &sqlx::mysql::MySqlRow) -> Result<VerificationRecord, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Storage {
            message: format!("failed to read id column: {}", e),
        })?;
        let id = Uuid::parse_str(&id).map_err(|e| DomainError::Storage {
            message: format!("malformed record id {}: {}", id, e),
        })?;

        let state: String = row.try_get("state").map_err(|e| DomainError::Storage {
            message: format!("failed to read state column: {}", e),
        })?;
        let state = CodeState::parse(&state).ok_or_else(|| DomainError::Storage {
            message: format!("unknown record state '{}'", state),
        })?;

        Ok(VerificationRecord {
            id,
            email: row.try_get("email").map_err(|e| DomainError::Storage {
                message: format!("failed to read email column: {}", e),
            })?,
            code: row.try_get("code").map_err(|e| DomainError::Storage {
                message: format!("failed to read code column: {}", e),
            })?,
            attempts: row.try_get("attempts").map_err(|e| DomainError::Storage {
                message: format!("failed to read attempts column: {}", e),
            })?,
            created_at: row.try_get("created_at").map_err(|e| DomainError::Storage {
                message: format!("failed to read created_at column: {}", e),
            })?,
            expires_at: row.try_get("expires_at").map_err(|e| DomainError::Storage {
                message: format!("failed to read expires_at column: {}", e),
            })?,
            state,
        })
    }
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn create(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationRecord, DomainError> {
        let query = r#"
            INSERT INTO verification_codes (
                id, email, code, attempts, state, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.email)
            .bind(&record.code)
            .bind(record.attempts)
            .bind(record.state.as_str())
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(&record.email),
                    error = %e,
                    "Failed to insert verification record"
                );
                Self::storage_error("failed to insert verification record", e)
            })?;

        debug!(
            email = %mask_email(&record.email),
            record_id = %record.id,
            "Inserted verification record"
        );

        Ok(record)
    }

    async fn find_latest_active(
        &self,
        email: &str,
    ) -> Result<Option<VerificationRecord>, DomainError> {
        let query = r#"
            SELECT id, email, code, attempts, state, created_at, expires_at
            FROM verification_codes
            WHERE email = ? AND state = 'active'
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(email),
                    error = %e,
                    "Failed to look up active verification record"
                );
                Self::storage_error("failed to look up active verification record", e)
            })?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS issued
            FROM verification_codes
            WHERE email = ? AND created_at >= ?
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to count issued records", e))?;

        row.try_get("issued").map_err(|e| DomainError::Storage {
            message: format!("failed to read issued count: {}", e),
        })
    }

    async fn supersede_active(&self, email: &str) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE verification_codes
            SET state = 'superseded'
            WHERE email = ? AND state = 'active'
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    email = %mask_email(email),
                    error = %e,
                    "Failed to supersede active verification records"
                );
                Self::storage_error("failed to supersede active records", e)
            })?;

        Ok(result.rows_affected())
    }

    async fn update(&self, record: &VerificationRecord) -> Result<(), DomainError> {
        let query = r#"
            UPDATE verification_codes
            SET attempts = ?, state = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(record.attempts)
            .bind(record.state.as_str())
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    record_id = %record.id,
                    error = %e,
                    "Failed to update verification record"
                );
                Self::storage_error("failed to update verification record", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Storage {
                message: format!("no verification record with id {}", record.id),
            });
        }

        Ok(())
    }

    async fn purge_dead(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = r#"
            DELETE FROM verification_codes
            WHERE state <> 'active' OR expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to purge dead records", e))?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            debug!(deleted, "Purged dead verification records");
        }

        Ok(deleted)
    }
}
