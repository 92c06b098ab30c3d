//! Business services

pub mod rate_limit;
pub mod verification;

pub use rate_limit::{RateLimitStatus, RateLimiterTrait};
pub use verification::{
    CleanupConfig, CleanupResult, CleanupService, CodeSenderTrait, IssuedCode, SendCodeResult,
    VerificationService, VerificationServiceConfig, VerifyOutcome,
};
