//! Rate limiter implementations of the core port
//!
//! Two interchangeable backends: an in-process map for single-instance
//! deployments and Redis for anything horizontally scaled.

mod memory;
mod redis;

pub use self::redis::RedisRateLimiter;
pub use memory::InMemoryRateLimiter;
