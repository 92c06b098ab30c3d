//! In-process fixed-window rate limiter
//!
//! Suitable for single-instance deployments and tests; counters live in a
//! map keyed by identifier and reset when their window lapses. Stale
//! windows are replaced lazily on next touch.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use mg_core::errors::DomainError;
use mg_core::services::rate_limit::{RateLimitStatus, RateLimiterTrait};

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    window_seconds: u64,
    count: u32,
}

impl Window {
    fn new(window_seconds: u64) -> Self {
        Self {
            started_at: Utc::now(),
            window_seconds,
            count: 1,
        }
    }

    fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.started_at + Duration::seconds(self.window_seconds as i64)
    }

    fn retry_after(&self, now: DateTime<Utc>) -> u64 {
        let end = self.started_at + Duration::seconds(self.window_seconds as i64);
        (end - now).num_seconds().max(1) as u64
    }
}

/// In-memory implementation of the rate limiter trait
#[derive(Default)]
pub struct InMemoryRateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl InMemoryRateLimiter {
    /// Create a new empty limiter
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(
        &self,
        key: &str,
        limit: u32,
        window_seconds: u64,
    ) -> Result<RateLimitStatus, DomainError> {
        let now = Utc::now();
        let mut windows = self.windows.write().await;

        match windows.get_mut(key) {
            Some(window) if !window.expired(now) => {
                if window.count >= limit {
                    Ok(RateLimitStatus::Exceeded {
                        retry_after_seconds: window.retry_after(now),
                    })
                } else {
                    window.count += 1;
                    Ok(RateLimitStatus::Ok {
                        remaining: limit.saturating_sub(window.count),
                    })
                }
            }
            _ => {
                windows.insert(key.to_string(), Window::new(window_seconds));
                Ok(RateLimitStatus::Ok {
                    remaining: limit.saturating_sub(1),
                })
            }
        }
    }

    async fn increment(&self, key: &str, window_seconds: u64) -> Result<i64, DomainError> {
        let now = Utc::now();
        let mut windows = self.windows.write().await;

        match windows.get_mut(key) {
            Some(window) if !window.expired(now) => {
                window.count += 1;
                Ok(window.count as i64)
            }
            _ => {
                windows.insert(key.to_string(), Window::new(window_seconds));
                Ok(1)
            }
        }
    }

    async fn reset(&self, key: &str) -> Result<(), DomainError> {
        self.windows.write().await.remove(key);
        Ok(())
    }
}
