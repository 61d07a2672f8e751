//! Client configuration. Built once, read-only afterwards.

use std::time::Duration;

use crate::http::RetryDelay;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default delay between attempts in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Bodies at least this large get progress reporting when enabled.
pub const PROGRESS_THRESHOLD_BYTES: u64 = 5 * 1024 * 1024;

/// Settings shared by every request a client sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    timeout: Duration,
    retries: u32,
    verbose: bool,
    show_progress: bool,
    retry_delay: RetryDelay,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            verbose: false,
            show_progress: false,
            retry_delay: RetryDelay::Fixed(Duration::from_millis(DEFAULT_RETRY_DELAY_MS)),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: RetryDelay) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn show_progress(&self) -> bool {
        self.show_progress
    }

    pub fn retry_delay(&self) -> RetryDelay {
        self.retry_delay
    }
}
