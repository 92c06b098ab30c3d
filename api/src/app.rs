//! Application wiring shared by the binary and the tests
//!
//! Route registration goes through `web::ServiceConfig` so the same
//! wiring serves the production binary and `actix_web::test` harnesses
//! without naming the app's full middleware type.

use actix_web::{web, HttpResponse};

use mg_core::repositories::VerificationRepository;
use mg_core::services::verification::CodeSenderTrait;

use crate::routes::verification;

/// Register every route of the API
pub fn configure_app<R, S>(cfg: &mut web::ServiceConfig)
where
    R: VerificationRepository + 'static,
    S: CodeSenderTrait + 'static,
{
    cfg.route("/health", web::get().to(health_check));
    verification::configure::<R, S>(cfg);
}

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "mailguard-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
