use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::dto::verification::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::error::{domain_error_response, outcome_error_response};

use mg_core::errors::ValidationError;
use mg_core::repositories::VerificationRepository;
use mg_core::services::verification::{CodeSenderTrait, VerifyOutcome};
use mg_shared::types::ApiResponse;
use mg_shared::utils::email::{is_valid_code_format, is_valid_email, mask_email, normalize_email};

use super::{extract_client_ip, AppState};

/// Handler for POST /api/v1/verification/verify-code
///
/// Validates a submitted code against the latest active record for the
/// address. Wrong and never-issued codes render the same message, so the
/// endpoint cannot be used to probe which addresses have codes pending.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "code": "123456" }
/// ```
pub async fn verify_code<R, S>(
    req: HttpRequest,
    state: web::Data<AppState<R, S>>,
    request: web::Json<VerifyCodeRequest>,
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
            "[{}] Rejected verify_code request with invalid address from ip: {}",
            request_id,
            client_ip
        );
        return domain_error_response(&ValidationError::InvalidEmail.into());
    }

    if !is_valid_code_format(&request.code) {
        log::warn!(
            "[{}] Rejected verify_code request with malformed code from ip: {}",
            request_id,
            client_ip
        );
        return domain_error_response(
            &ValidationError::InvalidFormat {
                field: "code".to_string(),
            }
            .into(),
        );
    }

    log::info!(
        "[{}] Processing verify_code request for email: {}, ip: {}",
        request_id,
        mask_email(&email),
        client_ip
    );

    match state
        .verification_service
        .verify(&email, &request.code)
        .await
    {
        Ok(VerifyOutcome::Success) => {
            log::info!(
                "[{}] Verification succeeded for email: {}",
                request_id,
                mask_email(&email)
            );
            HttpResponse::Ok().json(
                ApiResponse::success(VerifyCodeResponse {
                    verified: true,
                    message: VerifyOutcome::Success.user_message().to_string(),
                })
                .with_request_id(request_id),
            )
        }
        Ok(outcome) => {
            log::info!(
                "[{}] Verification failed for email: {}, outcome: {:?}",
                request_id,
                mask_email(&email),
                outcome
            );
            outcome_error_response(&outcome)
        }
        Err(error) => {
            log::error!(
                "[{}] Verification error for email: {}, ip: {}, error: {:?}",
                request_id,
                mask_email(&email),
                client_ip,
                error
            );
            domain_error_response(&error)
        }
    }
}
