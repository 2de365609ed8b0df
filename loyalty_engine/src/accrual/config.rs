use std::time::Duration;

use lps_common::helpers::env_or_default;

pub const DEFAULT_ACCRUAL_ADDRESS: &str = "http://127.0.0.1:8080";
pub const DEFAULT_ACCRUAL_TIMEOUT_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct AccrualClientConfig {
    /// The base URL of the accrual service, e.g. `http://accrual.local:8080`
    pub address: String,
    /// Upper bound on the duration of a single query
    pub timeout: Duration,
}

impl Default for AccrualClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ACCRUAL_ADDRESS.to_string(),
            timeout: Duration::from_millis(DEFAULT_ACCRUAL_TIMEOUT_MS),
        }
    }
}

impl AccrualClientConfig {
    pub fn new<S: Into<String>>(address: S, timeout: Duration) -> Self {
        Self { address: address.into(), timeout }
    }

    pub fn from_env_or_default() -> Self {
        let address = env_or_default("LPS_ACCRUAL_SYSTEM_ADDRESS", DEFAULT_ACCRUAL_ADDRESS.to_string());
        let timeout = Duration::from_millis(env_or_default("LPS_ACCRUAL_TIMEOUT_MS", DEFAULT_ACCRUAL_TIMEOUT_MS));
        Self { address, timeout }
    }
}
