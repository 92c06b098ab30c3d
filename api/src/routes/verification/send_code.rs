use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::dto::verification::{SendCodeRequest, SendCodeResponse};
use crate::handlers::error::domain_error_response;

use mg_core::errors::ValidationError;
use mg_core::repositories::VerificationRepository;
use mg_core::services::verification::CodeSenderTrait;
use mg_shared::types::ApiResponse;
use mg_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use super::{extract_client_ip, AppState};

/// Handler for POST /api/v1/verification/send-code
///
/// Issues a verification code for the address and delivers it by email.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com" }
/// ```
///
/// # Responses
///
/// - `200` - code issued and handed to the relay
/// - `400` - malformed address
/// - `429` - per-address quota or per-IP limit exceeded
/// - `503` - delivery failed (the code stays valid; verify still works
///   if the message arrives late)
pub async fn send_code<R, S>(
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
        log::warn!(
            "[{}] Rejected send_code request with invalid address from ip: {}",
            request_id,
            client_ip
        );
        return domain_error_response(&ValidationError::InvalidEmail.into());
    }

    log::info!(
        "[{}] Processing send_code request for email: {}, ip: {}",
        request_id,
        mask_email(&email),
        client_ip
    );

    match state.verification_service.send_code(&email).await {
        Ok(result) => {
            let expires_in = (result.expires_at - chrono::Utc::now())
                .num_seconds()
                .max(0);

            log::info!(
                "[{}] Verification code sent to: {}, message_id: {}",
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
                "[{}] Failed to send verification code to: {}, ip: {}, error: {:?}",
                request_id,
                mask_email(&email),
                client_ip,
                error
            );
            domain_error_response(&error)
        }
    }
}
