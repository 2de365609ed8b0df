//! Server configuration.
//!
//! Everything is read from `LPS_*` environment variables. Invalid values are logged and replaced with their defaults,
//! so the server always starts.
use std::env;

use log::*;
use loyalty_engine::{AccrualClientConfig, ReconciliationConfig};
use lps_common::helpers::env_or_default;

const DEFAULT_LPS_HOST: &str = "127.0.0.1";
const DEFAULT_LPS_PORT: u16 = 8081;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/loyalty_store.db";
pub const DEFAULT_SESSION_COOKIE: &str = "user_identification";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Where, and how patiently, to reach the accrual service
    pub accrual: AccrualClientConfig,
    /// Worker pool sizing and back-off behaviour
    pub reconciliation: ReconciliationConfig,
    /// The name of the cookie that carries the session token
    pub session_cookie: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPS_HOST.to_string(),
            port: DEFAULT_LPS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            accrual: AccrualClientConfig::default(),
            reconciliation: ReconciliationConfig::default(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LPS_HOST").ok().unwrap_or_else(|| DEFAULT_LPS_HOST.into());
        let port = env_or_default("LPS_PORT", DEFAULT_LPS_PORT);
        let database_url = env::var("LPS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ LPS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.into()
        });
        let session_cookie = match env::var("LPS_SESSION_COOKIE") {
            Ok(s) if is_valid_cookie_name(&s) => s,
            Ok(s) => {
                warn!("🪛️ '{s}' is not a valid cookie name. Using {DEFAULT_SESSION_COOKIE} instead.");
                DEFAULT_SESSION_COOKIE.into()
            },
            Err(_) => DEFAULT_SESSION_COOKIE.into(),
        };
        let accrual = AccrualClientConfig::from_env_or_default();
        let reconciliation = ReconciliationConfig::from_env_or_default();
        Self { host, port, database_url, accrual, reconciliation, session_cookie }
    }
}

/// Cookie names are RFC 6265 tokens: visible ASCII, excluding separators.
fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.session_cookie, "user_identification");
        assert_eq!(config.reconciliation.worker_count, 1);
        assert!(!config.reconciliation.credit_on_settlement);
    }

    #[test]
    fn cookie_names() {
        assert!(is_valid_cookie_name("user_identification"));
        assert!(is_valid_cookie_name("lps-session"));
        assert!(!is_valid_cookie_name(""));
        assert!(!is_valid_cookie_name("my session"));
        assert!(!is_valid_cookie_name("a=b"));
    }
}
