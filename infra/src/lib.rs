//! # MailGuard Infrastructure
//!
//! Infrastructure implementations of the core ports:
//! - MySQL-backed verification record store
//! - SMTP code delivery (plus a mock sender for development)
//! - In-memory and Redis rate limiters

pub mod database;
pub mod email;
pub mod rate_limit;

pub use database::mysql::MySqlVerificationRepository;
pub use email::{MockEmailSender, SmtpCodeSender};
pub use rate_limit::{InMemoryRateLimiter, RedisRateLimiter};
