//! Registry of API discovery documents.
//!
//! Two pieces:
//!
//! - [`registry::DiscoveryCatalog`]: a bundled (or caller supplied) index
//!   from service id to descriptor, including where each service's
//!   discovery document lives.
//! - [`discovery::load`] / [`discovery::DiscoveryLoader`]: fetch one
//!   document through a shared [`discovery::HttpClient`] and wrap it as a
//!   [`discovery::DiscoveryDocument`].
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use discovery_registry::config::HttpConfig;
//! use discovery_registry::discovery::{DiscoveryLoader, ReqwestClient};
//! use discovery_registry::registry::DiscoveryCatalog;
//!
//! let catalog = DiscoveryCatalog::load_bundled()?;
//! let loader = DiscoveryLoader::new(Arc::new(ReqwestClient::new(&HttpConfig::default())?));
//! let drive = loader.load(catalog.discovery_url("drive:v3")?).await?;
//! println!("{}", drive.api_name()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod tracing_fmt;

pub use discovery::{DiscoveryDocument, DiscoveryLoader, HttpClient, load};
pub use error::{CatalogError, DocumentError, FetchError, ServiceLoadError};
pub use registry::DiscoveryCatalog;
