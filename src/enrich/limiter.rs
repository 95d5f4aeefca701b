// src/enrich/limiter.rs
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Gate around outbound lookups: `acquire` before a call, `release` after it.
#[async_trait]
pub trait RateLimiter: Send {
    async fn acquire(&mut self);
    fn release(&mut self);
}

/// Waits until `interval` has passed since the previous `release`.
/// The first `acquire` returns immediately.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
    next: Option<Instant>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }
}

#[async_trait]
impl RateLimiter for FixedInterval {
    async fn acquire(&mut self) {
        if let Some(next) = self.next {
            trace!(wait = ?next.saturating_duration_since(Instant::now()), "rate limit");
            sleep_until(next).await;
        }
    }

    fn release(&mut self) {
        self.next = Some(Instant::now() + self.interval);
    }
}

/// No pacing at all. For tests and for resolvers that never leave the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&mut self) {}
    fn release(&mut self) {}
}
