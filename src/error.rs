//! Error types for discovery-registry.

use std::path::PathBuf;

/// Errors raised while building or reading a [`DiscoveryCatalog`].
///
/// Construction errors (`ResourceMissing`, `Read`, `Parse`) surface from the
/// constructors. Structural errors (`MissingItems`, `ItemsNotObject`,
/// `EntryNotObject`) only surface when the items view is accessed.
///
/// [`DiscoveryCatalog`]: crate::registry::DiscoveryCatalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Bundled discovery catalog is not available: {0}")]
    ResourceMissing(String),

    #[error("Failed to read catalog {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no \"items\" mapping")]
    MissingItems,

    #[error("Catalog \"items\" must be an object, found {found}")]
    ItemsNotObject { found: &'static str },

    #[error("Catalog entry '{id}' must be an object, found {found}")]
    EntryNotObject { id: String, found: &'static str },

    #[error("Service not found in catalog: {0}")]
    ServiceNotFound(String),

    #[error("Catalog entry '{id}' has no string field \"{field}\"")]
    MissingField { id: String, field: &'static str },
}

impl CatalogError {
    /// True for errors caused by the shape of an already-parsed catalog.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingItems | Self::ItemsNotObject { .. } | Self::EntryNotObject { .. }
        )
    }
}

/// Failure of a single discovery document fetch.
///
/// Produced by an [`HttpClient`] and returned by the loader unchanged.
///
/// [`HttpClient`]: crate::discovery::HttpClient
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid discovery document URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Response from {url} exceeds maximum allowed size ({max} bytes)")]
    TooLarge { url: String, max: usize },

    #[error("Failed to parse discovery document from {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl FetchError {
    /// The URL the failed request targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::TooLarge { url, .. }
            | Self::Parse { url, .. } => url,
        }
    }
}

/// Failure to resolve a service through the catalog and fetch its document.
#[derive(Debug, thiserror::Error)]
pub enum ServiceLoadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Shape mismatch inside a fetched discovery document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Discovery document field \"{field}\" is missing")]
    MissingField { field: String },

    #[error("Discovery document field \"{field}\" must be {expected}, found {found}")]
    InvalidShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
