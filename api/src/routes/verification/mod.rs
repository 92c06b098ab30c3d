//! Verification endpoints
//!
//! - `POST /send-code` - issue and deliver a code
//! - `POST /verify-code` - validate a submitted code
//! - `POST /resend-code` - re-issue, blocked while a code is outstanding

pub mod resend_code;
pub mod send_code;
pub mod verify_code;

use actix_web::{web, HttpRequest};
use std::sync::Arc;

use mg_core::repositories::VerificationRepository;
use mg_core::services::verification::{CodeSenderTrait, VerificationService};

pub use resend_code::resend_code;
pub use send_code::send_code;
pub use verify_code::verify_code;

/// Application state holding the shared verification service
pub struct AppState<R, S>
where
    R: VerificationRepository,
    S: CodeSenderTrait,
{
    pub verification_service: Arc<VerificationService<R, S>>,
}

/// Register the verification routes under `/api/v1/verification`
pub fn configure<R, S>(cfg: &mut web::ServiceConfig)
where
    R: VerificationRepository + 'static,
    S: CodeSenderTrait + 'static,
{
    cfg.service(
        web::scope("/api/v1/verification")
            .route("/send-code", web::post().to(send_code::<R, S>))
            .route("/verify-code", web::post().to(verify_code::<R, S>))
            .route("/resend-code", web::post().to(resend_code::<R, S>)),
    );
}

/// Extract client IP address from request (for audit logging)
pub(crate) fn extract_client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
