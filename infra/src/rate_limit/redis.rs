//! Redis-backed fixed-window rate limiter
//!
//! The counter for each identifier lives in a Redis key with the window
//! as its TTL, so limits are shared across instances. Identifiers are
//! hashed before they become key material; raw addresses and IPs never
//! reach Redis.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::sync::Arc;

use mg_core::errors::DomainError;
use mg_core::services::rate_limit::{RateLimitStatus, RateLimiterTrait};

/// Redis implementation of the rate limiter trait
pub struct RedisRateLimiter {
    client: Arc<Client>,
}

impl RedisRateLimiter {
    /// Create a limiter for the given Redis URL
    pub fn new(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    fn key_for(identifier: &str) -> String {
        format!("rate_limit:{}", hash_identifier(identifier))
    }

    fn internal_error(context: &str, e: redis::RedisError) -> DomainError {
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, DomainError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Self::internal_error("failed to connect to redis", e))
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn check(
        &self,
        key: &str,
        limit: u32,
        window_seconds: u64,
    ) -> Result<RateLimitStatus, DomainError> {
        let mut conn = self.connection().await?;
        let redis_key = Self::key_for(key);

        let count: Option<u32> = conn
            .get(&redis_key)
            .await
            .map_err(|e| Self::internal_error("failed to read rate limit counter", e))?;

        match count {
            Some(current) if current >= limit => {
                let ttl: i64 = conn
                    .ttl(&redis_key)
                    .await
                    .map_err(|e| Self::internal_error("failed to read rate limit ttl", e))?;
                Ok(RateLimitStatus::Exceeded {
                    retry_after_seconds: ttl.max(1) as u64,
                })
            }
            Some(_) => {
                let new_count: u32 = conn
                    .incr(&redis_key, 1)
                    .await
                    .map_err(|e| Self::internal_error("failed to increment rate limit", e))?;
                Ok(RateLimitStatus::Ok {
                    remaining: limit.saturating_sub(new_count),
                })
            }
            None => {
                // First request in this window: set counter with expiry
                let _: () = conn
                    .set_ex(&redis_key, 1u32, window_seconds)
                    .await
                    .map_err(|e| Self::internal_error("failed to start rate limit window", e))?;
                Ok(RateLimitStatus::Ok {
                    remaining: limit.saturating_sub(1),
                })
            }
        }
    }

    async fn increment(&self, key: &str, window_seconds: u64) -> Result<i64, DomainError> {
        let mut conn = self.connection().await?;
        let redis_key = Self::key_for(key);

        let count: i64 = conn
            .incr(&redis_key, 1)
            .await
            .map_err(|e| Self::internal_error("failed to increment rate limit", e))?;

        // Only the first increment starts the window clock
        if count == 1 {
            let _: bool = conn
                .expire(&redis_key, window_seconds as i64)
                .await
                .map_err(|e| Self::internal_error("failed to set rate limit expiry", e))?;
        }

        Ok(count)
    }

    async fn reset(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let redis_key = Self::key_for(key);

        let _: i64 = conn
            .del(&redis_key)
            .await
            .map_err(|e| Self::internal_error("failed to reset rate limit", e))?;

        Ok(())
    }
}

/// Hash an identifier for use in key material (privacy protection)
fn hash_identifier(identifier: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}
