use std::time::Duration;

use lps_common::helpers::{env_or_default, parse_boolean_flag};

pub const DEFAULT_WORKER_COUNT: usize = 1;
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 15;
pub const DEFAULT_UNAVAILABLE_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_MAX_RETRY_AFTER_SECS: u64 = 3600;
pub const DEFAULT_RESTART_DELAY_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct ReconciliationConfig {
    /// The number of workers the pool keeps alive. Always at least one.
    pub worker_count: usize,
    /// How long a worker sleeps after a 429 that did not carry a usable `Retry-After` header.
    pub default_retry_after: Duration,
    /// Upper bound on any rate-limit pause, whatever the accrual service asks for.
    pub max_retry_after: Duration,
    /// How long a worker sleeps after the accrual service was unavailable, or a store update failed.
    pub unavailable_backoff: Duration,
    /// Credit the owner's balance when an order settles as `PROCESSED`.
    pub credit_on_settlement: bool,
    /// Pause between a worker dying and its replacement starting. Stops a worker that panics on every order from
    /// spinning the supervisor.
    pub restart_delay: Duration,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            default_retry_after: Duration::from_secs(DEFAULT_RETRY_AFTER_SECS),
            max_retry_after: Duration::from_secs(DEFAULT_MAX_RETRY_AFTER_SECS),
            unavailable_backoff: Duration::from_millis(DEFAULT_UNAVAILABLE_BACKOFF_MS),
            credit_on_settlement: false,
            restart_delay: Duration::from_millis(DEFAULT_RESTART_DELAY_MS),
        }
    }
}

impl ReconciliationConfig {
    pub fn from_env_or_default() -> Self {
        let worker_count = env_or_default("LPS_WORKER_COUNT", DEFAULT_WORKER_COUNT).max(1);
        let default_retry_after = Duration::from_secs(env_or_default("LPS_DEFAULT_RETRY_AFTER", DEFAULT_RETRY_AFTER_SECS));
        let max_retry_after = Duration::from_secs(env_or_default("LPS_MAX_RETRY_AFTER", DEFAULT_MAX_RETRY_AFTER_SECS));
        let unavailable_backoff =
            Duration::from_millis(env_or_default("LPS_UNAVAILABLE_BACKOFF_MS", DEFAULT_UNAVAILABLE_BACKOFF_MS));
        let credit_on_settlement = parse_boolean_flag(std::env::var("LPS_CREDIT_ON_SETTLEMENT").ok(), false);
        let restart_delay = Duration::from_millis(env_or_default("LPS_RESTART_DELAY_MS", DEFAULT_RESTART_DELAY_MS));
        Self {
            worker_count,
            default_retry_after,
            max_retry_after,
            unavailable_backoff,
            credit_on_settlement,
            restart_delay,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_default_retry_after(mut self, delay: Duration) -> Self {
        self.default_retry_after = delay;
        self
    }

    pub fn with_max_retry_after(mut self, delay: Duration) -> Self {
        self.max_retry_after = delay;
        self
    }

    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn with_unavailable_backoff(mut self, delay: Duration) -> Self {
        self.unavailable_backoff = delay;
        self
    }

    pub fn with_credit_on_settlement(mut self, credit: bool) -> Self {
        self.credit_on_settlement = credit;
        self
    }
}
