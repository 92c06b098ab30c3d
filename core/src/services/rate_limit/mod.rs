//! Rate limiting port for transport-level throttling.
//!
//! The limiter is an injectable store keyed by an opaque identifier with
//! TTL-window semantics, so deployments can swap an in-process map for a
//! shared external store without touching the call sites.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    /// Request is within limits
    Ok { remaining: u32 },
    /// Rate limit exceeded
    Exceeded { retry_after_seconds: u64 },
}

impl RateLimitStatus {
    /// Whether the request may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitStatus::Ok { .. })
    }
}

/// Rate limiting service trait for throttling API requests per identifier
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Check the limit for `key` and, when allowed, count this request
    /// against the window
    async fn check(
        &self,
        key: &str,
        limit: u32,
        window_seconds: u64,
    ) -> Result<RateLimitStatus, DomainError>;

    /// Count a request against the window without enforcing a limit
    ///
    /// # Returns
    /// The number of requests recorded in the current window
    async fn increment(&self, key: &str, window_seconds: u64) -> Result<i64, DomainError>;

    /// Clear all counters for `key`
    async fn reset(&self, key: &str) -> Result<(), DomainError>;
}
