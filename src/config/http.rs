use crate::config::helpers::{optional_env, parse_positive_env};
use crate::error::ConfigError;

/// Default cap on a discovery document body (16 MiB).
///
/// The largest public discovery documents are a few megabytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Settings for the shared HTTP client.
///
/// These configure the client handed to the loader; the loader itself
/// enforces none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout. Env: `DISCOVERY_HTTP_TIMEOUT_SECS` (default: 30).
    pub timeout_secs: u64,
    /// `User-Agent` header. Env: `DISCOVERY_USER_AGENT`.
    pub user_agent: String,
    /// Response body cap. Env: `DISCOVERY_MAX_RESPONSE_BYTES` (default: 16 MiB).
    pub max_response_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: default_user_agent(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

fn default_user_agent() -> String {
    format!("discovery-registry/{}", env!("CARGO_PKG_VERSION"))
}

impl HttpConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: parse_positive_env("DISCOVERY_HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            user_agent: optional_env("DISCOVERY_USER_AGENT")?.unwrap_or(defaults.user_agent),
            max_response_bytes: parse_positive_env(
                "DISCOVERY_MAX_RESPONSE_BYTES",
                defaults.max_response_bytes,
            )?,
        })
    }
}
