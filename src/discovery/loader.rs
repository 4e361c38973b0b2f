//! Fetches discovery documents through an [`HttpClient`].
//!
//! ```text
//! load(client, url)
//!   │
//!   ├── DiscoveryRequest::get(url)      invalid url ──► Err(FetchError)
//!   │
//!   ├── client.get_json(&request).await  failure ─────► Err(FetchError), unchanged
//!   │
//!   └── DiscoveryDocument::new(object) ───────────────► Ok(document)
//! ```
//!
//! One request per call. No retries, caching or timeouts here: those belong
//! to the client.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::discovery::client::{DiscoveryRequest, HttpClient};
use crate::discovery::document::DiscoveryDocument;
use crate::error::{FetchError, ServiceLoadError};
use crate::registry::DiscoveryCatalog;

/// Fetch and parse the discovery document at `discovery_doc_path`.
pub async fn load<C>(client: &C, discovery_doc_path: &str) -> Result<DiscoveryDocument, FetchError>
where
    C: HttpClient + ?Sized,
{
    let request = DiscoveryRequest::get(discovery_doc_path)?;
    let start = Instant::now();

    tracing::debug!(url = %request.url(), "Fetching discovery document");
    let value = client.get_json(&request).await?;
    tracing::debug!(
        url = %request.url(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched discovery document"
    );

    Ok(DiscoveryDocument::new(value))
}

/// Loader bound to one shared client.
///
/// Cloning is cheap; all clones dispatch through the same client.
#[derive(Clone)]
pub struct DiscoveryLoader {
    client: Arc<dyn HttpClient>,
}

impl DiscoveryLoader {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn HttpClient> {
        &self.client
    }

    /// Fetch the document at a URL.
    pub async fn load(&self, discovery_doc_path: &str) -> Result<DiscoveryDocument, FetchError> {
        load(self.client.as_ref(), discovery_doc_path).await
    }

    /// Resolve a service's document location in `catalog`, then fetch it.
    pub async fn load_service(
        &self,
        catalog: &DiscoveryCatalog,
        service_id: &str,
    ) -> Result<DiscoveryDocument, ServiceLoadError> {
        let url = catalog.discovery_url(service_id)?;
        Ok(self.load(url).await?)
    }

    /// Fetch several documents concurrently. Each load is independent; the
    /// results line up with the input order whatever order they finish in.
    pub async fn load_all<I, S>(&self, urls: I) -> Vec<Result<DiscoveryDocument, FetchError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<S> = urls.into_iter().collect();
        join_all(urls.iter().map(|url| self.load(url.as_ref()))).await
    }
}

impl std::fmt::Debug for DiscoveryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryLoader").finish_non_exhaustive()
    }
}
