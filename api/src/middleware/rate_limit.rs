//! Per-IP rate limiting middleware for the verification endpoints
//!
//! Issuance and validation each get their own fixed-window budget per
//! caller IP. This throttling is transport-level protection only; the
//! per-address issuance quota lives inside the verification service and
//! applies regardless of which IPs the requests come from.
//!
//! The counter store is injected through the core `RateLimiterTrait`, so
//! a single-instance deployment can use the in-process map while a
//! multi-instance deployment shares a Redis backend.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorTooManyRequests,
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use mg_core::services::rate_limit::{RateLimitStatus, RateLimiterTrait};
use mg_shared::config::{EndpointLimit, RateLimitConfig};
use mg_shared::errors::{error_codes, ErrorResponse};

/// Rate limiter middleware factory
pub struct RateLimiter {
    limiter: Arc<dyn RateLimiterTrait>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter over an injected counter store
    pub fn new(limiter: Arc<dyn RateLimiterTrait>, config: RateLimitConfig) -> Self {
        Self { limiter, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiterTrait>,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if !config.enabled {
                return service.call(req).await;
            }

            // Each endpoint class gets its own budget and counter scope
            let limit = limit_for_path(req.path(), &config);

            if let Some((scope, limit)) = limit {
                let ip = get_client_ip(&req);
                let key = format!("{}:{}", scope, ip);

                match limiter
                    .check(&key, limit.max_requests, limit.window_seconds)
                    .await
                {
                    Ok(RateLimitStatus::Exceeded {
                        retry_after_seconds,
                    }) => {
                        log::warn!(
                            "Rate limit exceeded for {} on {} (retry after {}s)",
                            ip,
                            req.path(),
                            retry_after_seconds
                        );
                        let body = ErrorResponse::new(
                            error_codes::RATE_LIMIT_EXCEEDED,
                            "Too many requests. Please try again later.",
                        )
                        .add_detail("retry_after_seconds", retry_after_seconds);
                        return Err(ErrorTooManyRequests(
                            serde_json::to_value(body).unwrap_or_default(),
                        ));
                    }
                    Ok(RateLimitStatus::Ok { .. }) => {}
                    Err(e) => {
                        // Fail open: a broken counter store must not take
                        // the verification endpoints down with it
                        log::warn!("Rate limit check failed, allowing request: {}", e);
                    }
                }
            }

            service.call(req).await
        })
    }
}

fn limit_for_path<'a>(
    path: &str,
    config: &'a RateLimitConfig,
) -> Option<(&'static str, &'a EndpointLimit)> {
    if path.ends_with("/send-code") || path.ends_with("/resend-code") {
        Some(("issuance", &config.issuance))
    } else if path.ends_with("/verify-code") {
        Some(("verification", &config.verification))
    } else {
        None
    }
}

/// Extract the client IP, honoring reverse-proxy headers
fn get_client_ip(req: &ServiceRequest) -> String {
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
