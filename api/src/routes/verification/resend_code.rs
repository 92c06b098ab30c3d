use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::dto::verification::{SendCodeRequest, SendCodeResponse};
use crate::handlers::error::domain_error_response;

use mg_core::errors::{ValidationError, VerificationError};
use mg_core::repositories::VerificationRepository;
use mg_core::services::verification::CodeSenderTrait;
use mg_shared::types::ApiResponse;
use mg_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use super::{extract_client_ip, AppState};

/// Handler for POST /api/v1/verification/resend-code
///
/// Re-issues a verification code, but only once the previous code is no
/// longer outstanding. While an unexpired code exists the request is
/// refused; this gate sits on top of the issuance quota, it does not
/// replace it.
pub async fn resend_code<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    R: VerificationRepository + 'static,
    S: CodeSenderTrait + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let client_ip = extract_client_ip(&req);

    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return domain_error_response(&ValidationError::InvalidEmail.into());
    }

    log::info!(
        "[{}] Processing resend_code request for email: {}, ip: {}",
        request_id,
        mask_email(&email),
        client_ip
    );

    match state.verification_service.has_active_code(&email).await {
        Ok(true) => {
            log::info!(
                "[{}] Refused resend while a code is outstanding for email: {}",
                request_id,
                mask_email(&email)
            );
            return domain_error_response(&VerificationError::CodeOutstanding.into());
        }
        Ok(false) => {}
        Err(error) => {
            log::error!(
                "[{}] Failed to check outstanding code for email: {}, error: {:?}",
                request_id,
                mask_email(&email),
                error
            );
            return domain_error_response(&error);
        }
    }

    match state.verification_service.send_code(&email).await {
        Ok(result) => {
            let expires_in = (result.expires_at - chrono::Utc::now())
                .num_seconds()
                .max(0);

            log::info!(
                "[{}] Verification code resent to: {}, message_id: {}",
                request_id,
                mask_email(&email),
                result.message_id
            );

            HttpResponse::Ok().json(
                ApiResponse::success(SendCodeResponse {
                    message: "Verification code sent. Please check your inbox.".to_string(),
                    expires_in,
                })
                .with_request_id(request_id),
            )
        }
        Err(error) => {
            log::error!(
                "[{}] Failed to resend verification code to: {}, ip: {}, error: {:?}",
                request_id,
                mask_email(&email),
                client_ip,
                error
            );
            domain_error_response(&error)
        }
    }
}
