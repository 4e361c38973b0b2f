use std::path::PathBuf;

use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Where the catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// On-disk catalog replacing the bundled one. Env: `DISCOVERY_CATALOG_PATH`.
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            path: optional_env("DISCOVERY_CATALOG_PATH")?.map(PathBuf::from),
        })
    }
}
