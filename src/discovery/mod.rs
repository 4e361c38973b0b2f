//! Discovery documents: fetching and reading them.
//!
//! ```text
//! discovery/
//! ├── client.rs    <- HttpClient seam + reqwest implementation
//! ├── loader.rs    <- load(client, url) -> DiscoveryDocument
//! ├── document.rs  <- DiscoveryDocument accessors
//! └── endpoint.rs  <- DiscoveryEndpoint and URL template matching
//! ```

pub mod client;
pub mod document;
pub mod endpoint;
pub mod loader;

pub use client::{DiscoveryRequest, HttpClient, ReqwestClient};
pub use document::DiscoveryDocument;
pub use endpoint::DiscoveryEndpoint;
pub use loader::{DiscoveryLoader, load};
