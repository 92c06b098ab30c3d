//! Handler tests for the send-code and resend-code endpoints

use actix_web::{test, web, App};
use std::sync::Arc;

use mg_api::app::configure_app;
use mg_api::routes::verification::AppState;
use mg_core::repositories::MockVerificationRepository;
use mg_core::services::verification::{VerificationService, VerificationServiceConfig};
use mg_infra::MockEmailSender;

type MockState = AppState<MockVerificationRepository, MockEmailSender>;

fn build_state(
    sender: MockEmailSender,
) -> (
    web::Data<MockState>,
    Arc<MockVerificationRepository>,
    Arc<MockEmailSender>,
) {
    let repository = Arc::new(MockVerificationRepository::new());
    let sender = Arc::new(sender);
    let service = Arc::new(VerificationService::new(
        repository.clone(),
        sender.clone(),
        VerificationServiceConfig::default(),
    ));
    (
        web::Data::new(AppState {
            verification_service: service,
        }),
        repository,
        sender,
    )
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure_app::<MockVerificationRepository, MockEmailSender>),
        )
        .await
    };
}

#[actix_web::test]
async fn send_code_returns_success_envelope() {
    let (state, _repo, sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["expires_in"].as_i64().unwrap() > 0);

    assert_eq!(sender.sent_count(), 1);
}

#[actix_web::test]
async fn send_code_normalizes_address_case() {
    let (state, repo, _sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "  User@Example.COM " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    assert_eq!(repo.records_for("user@example.com").await.len(), 1);
}

#[actix_web::test]
async fn send_code_rejects_invalid_address() {
    let (state, repo, _sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    assert!(repo.is_empty().await);
}

#[actix_web::test]
async fn send_code_quota_returns_429() {
    let (state, _repo, _sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/verification/send-code")
            .set_json(serde_json::json!({ "email": "user@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 429);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "QUOTA_EXCEEDED");
    assert_eq!(body["details"]["retry_after_minutes"], 60);
}

#[actix_web::test]
async fn send_code_delivery_failure_returns_503() {
    let (state, repo, _sender) = build_state(MockEmailSender::failing());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "DELIVERY_FAILED");

    // The record was persisted before the delivery attempt
    assert_eq!(repo.len().await, 1);
}

#[actix_web::test]
async fn resend_blocked_while_code_outstanding() {
    let (state, _repo, _sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/resend-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CODE_OUTSTANDING");
}

#[actix_web::test]
async fn transport_rate_limit_throttles_per_ip() {
    use actix_web::dev::Service;
    use mg_api::middleware::rate_limit::RateLimiter;
    use mg_core::services::rate_limit::RateLimiterTrait;
    use mg_infra::InMemoryRateLimiter;
    use mg_shared::config::RateLimitConfig;

    let (state, _repo, _sender) = build_state(MockEmailSender::new());
    let limiter: Arc<dyn RateLimiterTrait> = Arc::new(InMemoryRateLimiter::new());

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(RateLimiter::new(limiter, RateLimitConfig::default()))
            .configure(configure_app::<MockVerificationRepository, MockEmailSender>),
    )
    .await;

    // Five issuance requests per IP per window; distinct addresses keep
    // the per-address quota out of the picture
    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/verification/send-code")
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .set_json(serde_json::json!({ "email": format!("user{}@example.com", i) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .set_json(serde_json::json!({ "email": "user5@example.com" }))
        .to_request();
    let status = match app.call(req).await {
        Ok(resp) => resp.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, 429);

    // A different IP still has its own budget
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .insert_header(("X-Forwarded-For", "198.51.100.9"))
        .set_json(serde_json::json!({ "email": "user6@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn resend_works_when_nothing_outstanding() {
    let (state, _repo, sender) = build_state(MockEmailSender::new());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/resend-code")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(sender.sent_count(), 1);
}
