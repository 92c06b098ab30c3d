//! Integration tests for the verification code lifecycle
//!
//! These tests drive the public service API against the in-memory
//! repository, seeding back-dated records where a scenario depends on
//! elapsed time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use mg_core::domain::entities::verification_record::{CodeState, VerificationRecord};
use mg_core::errors::{DomainError, VerificationError};
use mg_core::repositories::verification::{MockVerificationRepository, VerificationRepository};
use mg_core::services::verification::{
    CleanupConfig, CleanupService, CodeSenderTrait, VerificationService,
    VerificationServiceConfig, VerifyOutcome,
};

struct RecordingSender {
    sent: Mutex<HashMap<String, String>>,
}

impl RecordingSender {
    fn new() -> Self {
        Self {
            sent: Mutex::new(HashMap::new()),
        }
    }

    fn code_for(&self, email: &str) -> Option<String> {
        self.sent.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl CodeSenderTrait for RecordingSender {
    async fn send_code(&self, email: &str, code: &str) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .insert(email.to_string(), code.to_string());
        Ok(format!("msg-{}", code))
    }
}

fn build_service(
    repo: Arc<MockVerificationRepository>,
) -> VerificationService<MockVerificationRepository, RecordingSender> {
    VerificationService::new(
        repo,
        Arc::new(RecordingSender::new()),
        VerificationServiceConfig::default(),
    )
}

fn backdated_record(email: &str, minutes_ago: i64) -> VerificationRecord {
    let mut record = VerificationRecord::new(email.to_string());
    record.created_at = Utc::now() - Duration::minutes(minutes_ago);
    record.expires_at = record.created_at + Duration::minutes(15);
    record
}

const EMAIL: &str = "a@b.com";

#[tokio::test]
async fn quota_counts_trailing_sixty_minute_window() {
    // Issuances at T=0, T=10min, T=50min; it is now T=55min
    let repo = Arc::new(MockVerificationRepository::new());
    repo.create(backdated_record(EMAIL, 55)).await.unwrap();
    repo.create(backdated_record(EMAIL, 45)).await.unwrap();
    repo.create(backdated_record(EMAIL, 5)).await.unwrap();

    let service = build_service(repo.clone());

    // Fourth issuance inside the window fails and creates nothing
    let result = service.issue(EMAIL).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Verification(VerificationError::QuotaExceeded { .. })
    ));
    assert_eq!(repo.len().await, 3);
}

#[tokio::test]
async fn quota_window_slides_past_oldest_issuance() {
    // Same history, but it is now T=61min: the T=0 issuance left the window
    let repo = Arc::new(MockVerificationRepository::new());
    repo.create(backdated_record(EMAIL, 61)).await.unwrap();
    repo.create(backdated_record(EMAIL, 51)).await.unwrap();
    repo.create(backdated_record(EMAIL, 11)).await.unwrap();

    let service = build_service(repo.clone());

    assert!(service.issue(EMAIL).await.is_ok());
    assert_eq!(repo.len().await, 4);
}

#[tokio::test]
async fn correct_code_just_inside_expiry_succeeds() {
    let repo = Arc::new(MockVerificationRepository::new());

    // Issued almost fifteen minutes ago, with seconds to spare
    let mut record = VerificationRecord::new(EMAIL.to_string());
    record.created_at = Utc::now() - Duration::minutes(14) - Duration::seconds(30);
    record.expires_at = record.created_at + Duration::minutes(15);
    let code = record.code.clone();
    repo.create(record).await.unwrap();

    let service = build_service(repo);
    let outcome = service.verify(EMAIL, &code).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Success);
}

#[tokio::test]
async fn correct_code_just_past_expiry_is_expired() {
    let repo = Arc::new(MockVerificationRepository::new());

    let mut record = VerificationRecord::new(EMAIL.to_string());
    record.created_at = Utc::now() - Duration::minutes(15) - Duration::seconds(1);
    record.expires_at = record.created_at + Duration::minutes(15);
    let code = record.code.clone();
    let id = record.id;
    repo.create(record).await.unwrap();

    let service = build_service(repo.clone());
    let outcome = service.verify(EMAIL, &code).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Expired);

    // The record is unusable for any further call
    let stored = repo.get(id).await.unwrap();
    assert_eq!(stored.state, CodeState::Expired);
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::NotFound
    );
}

#[tokio::test]
async fn cleanup_removes_dead_records_only() {
    let repo = Arc::new(MockVerificationRepository::new());

    // Unconsumed and unexpired: must survive
    let live = VerificationRecord::new("live@b.com".to_string());
    let live_id = live.id;
    repo.create(live).await.unwrap();

    // Consumed in every terminal way
    for (email, state) in [
        ("done@b.com", CodeState::Succeeded),
        ("old@b.com", CodeState::Expired),
        ("burned@b.com", CodeState::Exhausted),
        ("replaced@b.com", CodeState::Superseded),
    ] {
        let mut record = VerificationRecord::new(email.to_string());
        record.state = state;
        repo.create(record).await.unwrap();
    }

    // Expired but never touched by validation
    let mut stale = VerificationRecord::new("stale@b.com".to_string());
    stale.expires_at = Utc::now() - Duration::seconds(5);
    repo.create(stale).await.unwrap();

    let cleanup = CleanupService::new(repo.clone(), CleanupConfig::default());
    let result = cleanup.run_cleanup().await.unwrap();

    assert_eq!(result.records_deleted, 5);
    assert_eq!(repo.len().await, 1);
    assert!(repo.get(live_id).await.is_some());
}

#[tokio::test]
async fn cleanup_disabled_is_a_no_op() {
    let repo = Arc::new(MockVerificationRepository::new());
    let mut record = VerificationRecord::new(EMAIL.to_string());
    record.state = CodeState::Succeeded;
    repo.create(record).await.unwrap();

    let cleanup = CleanupService::new(
        repo.clone(),
        CleanupConfig {
            enabled: false,
            ..Default::default()
        },
    );
    let result = cleanup.run_cleanup().await.unwrap();

    assert_eq!(result.records_deleted, 0);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn full_lifecycle_issue_fail_then_succeed() {
    let repo = Arc::new(MockVerificationRepository::new());
    let sender = Arc::new(RecordingSender::new());
    let service = VerificationService::new(
        repo.clone(),
        sender.clone(),
        VerificationServiceConfig::default(),
    );

    service.send_code(EMAIL).await.unwrap();
    assert!(service.has_active_code(EMAIL).await.unwrap());

    let code = sender.code_for(EMAIL).unwrap();
    let wrong = if code == "100000" { "100001" } else { "100000" };

    assert_eq!(
        service.verify(EMAIL, wrong).await.unwrap(),
        VerifyOutcome::Mismatch {
            attempts_remaining: 4
        }
    );
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::Success
    );

    // Consumed: nothing outstanding, nothing verifiable
    assert!(!service.has_active_code(EMAIL).await.unwrap());
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::NotFound
    );
}

#[tokio::test]
async fn superseded_code_stops_verifying() {
    let repo = Arc::new(MockVerificationRepository::new());
    let sender = Arc::new(RecordingSender::new());
    let service = VerificationService::new(
        repo.clone(),
        sender.clone(),
        VerificationServiceConfig::default(),
    );

    service.send_code(EMAIL).await.unwrap();
    let first_code = sender.code_for(EMAIL).unwrap();

    service.send_code(EMAIL).await.unwrap();
    let second_code = sender.code_for(EMAIL).unwrap();

    if first_code != second_code {
        // The superseded code no longer matches anything
        assert!(matches!(
            service.verify(EMAIL, &first_code).await.unwrap(),
            VerifyOutcome::Mismatch { .. }
        ));
    }
    assert_eq!(
        service.verify(EMAIL, &second_code).await.unwrap(),
        VerifyOutcome::Success
    );
}
