//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `email` - SMTP delivery configuration
//! - `rate_limit` - Transport-level rate limiting for the API endpoints
//! - `server` - HTTP server and CORS configuration
//! - `verification` - Verification code lifecycle settings

pub mod database;
pub mod email;
pub mod rate_limit;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use email::SmtpConfig;
pub use rate_limit::{EndpointLimit, RateLimitConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// SMTP delivery configuration
    pub smtp: SmtpConfig,

    /// Verification code lifecycle configuration
    pub verification: VerificationConfig,

    /// Transport rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            smtp: SmtpConfig::default(),
            verification: VerificationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the complete configuration from environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            smtp: SmtpConfig::from_env(),
            verification: VerificationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::from_env(),
        }
    }
}
