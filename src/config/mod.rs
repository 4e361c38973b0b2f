//! Configuration for the `discovery` binary.
//!
//! Everything is read from environment variables (optionally seeded from a
//! `.env` file by the binary). The library types never read the environment
//! themselves; callers build clients and catalogs from a resolved [`Config`].

mod catalog;
pub(crate) mod helpers;
mod http;

pub use catalog::CatalogConfig;
pub use http::{DEFAULT_MAX_RESPONSE_BYTES, HttpConfig};

use crate::config::helpers::parse_positive_env;
use crate::error::ConfigError;

/// Terminal logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Per-event cap for stderr output. Env: `DISCOVERY_LOG_MAX_EVENT_BYTES` (default: 500).
    pub max_event_bytes: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_event_bytes: crate::tracing_fmt::TERMINAL_MAX_EVENT_BYTES,
        }
    }
}

impl LoggingConfig {
    fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            max_event_bytes: parse_positive_env(
                "DISCOVERY_LOG_MAX_EVENT_BYTES",
                Self::default().max_event_bytes,
            )?,
        })
    }
}

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub http: HttpConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve every section from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpConfig::resolve()?,
            catalog: CatalogConfig::resolve()?,
            logging: LoggingConfig::resolve()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::helpers::ENV_MUTEX;

    const VARS: [&str; 5] = [
        "DISCOVERY_HTTP_TIMEOUT_SECS",
        "DISCOVERY_USER_AGENT",
        "DISCOVERY_MAX_RESPONSE_BYTES",
        "DISCOVERY_CATALOG_PATH",
        "DISCOVERY_LOG_MAX_EVENT_BYTES",
    ];

    fn clear_vars() {
        for var in VARS {
            // SAFETY: callers hold ENV_MUTEX.
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_defaults_when_unset() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();

        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("discovery-registry/"));
        assert_eq!(config.http.max_response_bytes, DEFAULT_MAX_RESPONSE_BYTES);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.logging.max_event_bytes, 500);
    }

    #[test]
    fn test_overrides_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        // SAFETY: ENV_MUTEX is held.
        unsafe {
            std::env::set_var("DISCOVERY_HTTP_TIMEOUT_SECS", "5");
            std::env::set_var("DISCOVERY_USER_AGENT", "probe/1.0");
            std::env::set_var("DISCOVERY_CATALOG_PATH", "/tmp/catalog.json");
            std::env::set_var("DISCOVERY_LOG_MAX_EVENT_BYTES", "2048");
        }

        let config = Config::from_env().unwrap();
        clear_vars();

        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent, "probe/1.0");
        assert_eq!(
            config.catalog.path.as_deref(),
            Some(std::path::Path::new("/tmp/catalog.json"))
        );
        assert_eq!(config.logging.max_event_bytes, 2048);
    }

    #[test]
    fn test_empty_value_means_unset() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        // SAFETY: ENV_MUTEX is held.
        unsafe { std::env::set_var("DISCOVERY_CATALOG_PATH", "") };

        let config = Config::from_env().unwrap();
        clear_vars();

        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_vars();
        // SAFETY: ENV_MUTEX is held.
        unsafe { std::env::set_var("DISCOVERY_HTTP_TIMEOUT_SECS", "soon") };
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "DISCOVERY_HTTP_TIMEOUT_SECS"
        ));

        // SAFETY: ENV_MUTEX is held.
        unsafe { std::env::set_var("DISCOVERY_HTTP_TIMEOUT_SECS", "0") };
        let err = Config::from_env().unwrap_err();
        clear_vars();
        assert!(err.to_string().contains("greater than zero"));
    }
}
