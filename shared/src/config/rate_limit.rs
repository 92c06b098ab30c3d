//! Transport-level rate limiting configuration
//!
//! These limits are enforced per caller IP at the API edge. They are
//! independent of, and in addition to, the per-address issuance quota
//! applied inside the verification service.

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for the API endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Limit for the code-issuance endpoints (send / resend)
    pub issuance: EndpointLimit,

    /// Limit for the code-validation endpoint
    pub verification: EndpointLimit,
}

/// A single fixed-window endpoint limit
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct EndpointLimit {
    /// Max requests per IP within the window
    pub max_requests: u32,

    /// Window duration in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            issuance: EndpointLimit {
                max_requests: 5,
                window_seconds: 900, // 15 minutes
            },
            verification: EndpointLimit {
                max_requests: 10,
                window_seconds: 900,
            },
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            issuance: EndpointLimit {
                max_requests: 100,
                window_seconds: 900,
            },
            verification: EndpointLimit {
                max_requests: 200,
                window_seconds: 900,
            },
        }
    }

    /// Create a production configuration (stricter limits)
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_enabled() -> bool {
    true
}
