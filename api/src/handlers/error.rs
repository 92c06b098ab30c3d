//! Mapping from domain errors and outcomes to HTTP responses
//!
//! Wording rules: storage and internal failures always render the same
//! generic message, and no response may reveal whether an address has an
//! account or how many codes exist for it.

use actix_web::HttpResponse;

use mg_core::errors::{DomainError, ValidationError, VerificationError};
use mg_core::services::verification::VerifyOutcome;
use mg_shared::errors::{error_codes, ErrorResponse};

/// Map a domain error to an HTTP response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Verification(VerificationError::QuotaExceeded {
            retry_after_minutes,
        }) => HttpResponse::TooManyRequests().json(
            ErrorResponse::new(
                error_codes::QUOTA_EXCEEDED,
                "Too many verification codes requested for this address. Please try again later.",
            )
            .add_detail("retry_after_minutes", retry_after_minutes),
        ),

        DomainError::Verification(VerificationError::DeliveryFailed) => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                error_codes::DELIVERY_FAILED,
                "We could not deliver your verification code. Please try again.",
            ))
        }

        DomainError::Verification(VerificationError::CodeOutstanding) => {
            HttpResponse::Conflict().json(ErrorResponse::new(
                error_codes::CODE_OUTSTANDING,
                "A verification code was recently sent to this address. Please check your inbox.",
            ))
        }

        DomainError::ValidationErr(ValidationError::InvalidEmail) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                "Please provide a valid email address.",
            ))
        }

        DomainError::Validation { .. } | DomainError::ValidationErr(_) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                "Invalid request data.",
            ))
        }

        // Internal detail never reaches the caller
        DomainError::Storage { .. } | DomainError::Internal { .. } => internal_error_response(),
    }
}

/// Generic internal error response
pub fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal error occurred. Please try again later.",
    ))
}

/// Map a validation outcome to an HTTP response
///
/// `NotFound` and `Mismatch` intentionally produce identical wording;
/// only the mismatch carries an `attempts_remaining` detail.
pub fn outcome_error_response(outcome: &VerifyOutcome) -> HttpResponse {
    match outcome {
        VerifyOutcome::Success => unreachable!("success is not an error outcome"),

        VerifyOutcome::Mismatch { attempts_remaining } => HttpResponse::BadRequest().json(
            ErrorResponse::new(error_codes::CODE_INVALID, outcome.user_message())
                .add_detail("attempts_remaining", attempts_remaining),
        ),

        VerifyOutcome::NotFound => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::CODE_INVALID,
            outcome.user_message(),
        )),

        VerifyOutcome::Expired => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::CODE_EXPIRED,
            outcome.user_message(),
        )),

        VerifyOutcome::AttemptsExhausted => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::CODE_ATTEMPTS_EXHAUSTED,
            outcome.user_message(),
        )),

        VerifyOutcome::InvalidFormat => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::VALIDATION_ERROR,
            outcome.user_message(),
        )),
    }
}
