use moka::future::Cache;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Message returned to clients that exceed the quota
pub const RATE_LIMIT_MESSAGE: &str = "Too many attempts, try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit exceeded for {0}")]
pub struct RateLimitExceeded(pub IpAddr);

/// Rolling-window quota settings
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Upper bound on addresses tracked at once
    pub max_tracked_addresses: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
            max_tracked_addresses: 10_000,
        }
    }
}

/// Per-address rolling-window rate limiter
///
/// Each address gets a queue of request instants. A request is admitted when
/// fewer than `max_requests` instants fall inside the trailing window; the
/// rejected request is not recorded.
///
/// Buckets live in a moka cache that only expires entries idle for a full
/// window, so a live window is never dropped. Once `max_tracked_addresses`
/// buckets exist, requests from untracked addresses are rejected until idle
/// buckets expire.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Cache<IpAddr, Arc<Mutex<VecDeque<Instant>>>>,
    // serializes bucket creation so the cap check and insert are atomic
    admission: tokio::sync::Mutex<()>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let buckets = Cache::builder().time_to_idle(config.window).build();

        Self {
            config,
            buckets,
            admission: tokio::sync::Mutex::new(()),
        }
    }

    /// Admit or reject a request from `ip` arriving now
    pub async fn check(&self, ip: IpAddr) -> Result<(), RateLimitExceeded> {
        self.check_at(ip, Instant::now()).await
    }

    /// Admit or reject a request from `ip` arriving at `now`
    pub async fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), RateLimitExceeded> {
        let bucket = match self.buckets.get(&ip).await {
            Some(bucket) => bucket,
            None => self.admit(ip).await?,
        };

        let mut hits = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(&oldest) = hits.front() {
            if now.saturating_duration_since(oldest) >= self.config.window {
                hits.pop_front();
            } else {
                break;
            }
        }

        if hits.len() >= self.config.max_requests as usize {
            tracing::warn!(
                ip = %ip,
                requests = hits.len(),
                max = self.config.max_requests,
                "rate limit exceeded"
            );
            return Err(RateLimitExceeded(ip));
        }

        hits.push_back(now);
        Ok(())
    }

    /// Create a bucket for an untracked address, unless the cap is reached
    async fn admit(&self, ip: IpAddr) -> Result<Arc<Mutex<VecDeque<Instant>>>, RateLimitExceeded> {
        let _guard = self.admission.lock().await;

        if let Some(bucket) = self.buckets.get(&ip).await {
            return Ok(bucket);
        }

        // flush pending inserts and expirations so entry_count is exact
        self.buckets.run_pending_tasks().await;
        if self.buckets.entry_count() >= self.config.max_tracked_addresses {
            tracing::warn!(
                ip = %ip,
                tracked_addresses = self.buckets.entry_count(),
                max_tracked_addresses = self.config.max_tracked_addresses,
                "rejecting new address: tracked address limit reached"
            );
            return Err(RateLimitExceeded(ip));
        }

        let bucket = Arc::new(Mutex::new(VecDeque::new()));
        self.buckets.insert(ip, bucket.clone()).await;
        Ok(bucket)
    }
}
