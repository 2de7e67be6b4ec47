//! Build-time configuration.
//!
//! The wasm bundle has no process environment at runtime, so the backend is
//! chosen when the bundle is built:
//!
//! ```text
//! MINIBANK_BACKEND=remote MINIBANK_API_URL=https://bank.example/api trunk build
//! ```

use std::time::Duration;

use log::warn;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://mockbankapi.example.com/api";

pub struct StorageKeys;

impl StorageKeys {
    pub const USER_DATA: &'static str = "miniBankUserData";
    pub const ACCOUNT_NUMBER: &'static str = "miniBankAccountNumber";
    pub const REMEMBER_ME: &'static str = "miniBankRememberMe";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Fixture,
    Remote { endpoint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    pub login_latency: Duration,
    pub transactions_latency: Duration,
    pub dashboard_warmup: Duration,
    pub error_banner: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            login_latency: Duration::from_millis(1500),
            transactions_latency: Duration::from_millis(1000),
            dashboard_warmup: Duration::from_millis(800),
            error_banner: Duration::from_millis(5000),
        }
    }
}

impl Timings {
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            login_latency: Duration::ZERO,
            transactions_latency: Duration::ZERO,
            dashboard_warmup: Duration::ZERO,
            error_banner: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub timings: Timings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Fixture,
            timings: Timings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(option_env!("MINIBANK_BACKEND"), option_env!("MINIBANK_API_URL"))
    }

    pub fn from_values(backend: Option<&str>, api_url: Option<&str>) -> Result<Self, ConfigError> {
        let backend = match backend.map(str::trim).filter(|b| !b.is_empty()) {
            None => Backend::Fixture,
            Some(b) if b.eq_ignore_ascii_case("fixture") || b.eq_ignore_ascii_case("mock") => {
                Backend::Fixture
            }
            Some(b) if b.eq_ignore_ascii_case("remote") => {
                let endpoint = api_url
                    .map(str::trim)
                    .unwrap_or(DEFAULT_API_URL)
                    .to_string();
                if endpoint.is_empty() {
                    return Err(ConfigError::MissingEndpoint);
                }
                if !endpoint.starts_with("https://") {
                    // credentials travel in the query string
                    warn!("remote endpoint {} is not https", endpoint);
                }
                Backend::Remote { endpoint }
            }
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            backend,
            timings: Timings::default(),
        })
    }
}
