//! Retry policy: delay schedule and the injectable wait.

use async_trait::async_trait;
use std::time::Duration;

/// How long to wait before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDelay {
    /// Same delay before every retry.
    Fixed(Duration),
    /// Retry `n` (1-based) waits `n * step`.
    Linear(Duration),
}

impl RetryDelay {
    /// Delay before retry number `retry` (1 for the first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match *self {
            RetryDelay::Fixed(delay) => delay,
            RetryDelay::Linear(step) => step.saturating_mul(retry.max(1)),
        }
    }
}

/// Performs the wait between attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}
