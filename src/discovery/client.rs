//! HTTP collaborator used to fetch discovery documents.
//!
//! The loader only knows the [`HttpClient`] trait. [`ReqwestClient`] is the
//! production implementation; tests substitute their own.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::config::HttpConfig;
use crate::error::FetchError;

/// A plain GET request for one discovery document.
///
/// Errors report the URL exactly as the caller passed it; the parsed form
/// sent on the wire may be normalized (e.g. a bare host gains a `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    requested: String,
    url: reqwest::Url,
}

impl DiscoveryRequest {
    /// Build a GET request for a fully-qualified http(s) URL.
    pub fn get(url: &str) -> Result<Self, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self {
                requested: url.to_string(),
                url: parsed,
            }),
            other => Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// The URL as given to [`DiscoveryRequest::get`].
    pub fn as_str(&self) -> &str {
        &self.requested
    }
}

/// Dispatches a GET and decodes the response body as a JSON object.
///
/// Implementations must be safe to call from many tasks at once. Network
/// failures, non-success statuses and undecodable bodies all resolve to a
/// [`FetchError`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get_json(&self, request: &DiscoveryRequest) -> Result<Map<String, Value>, FetchError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get_json(&self, request: &DiscoveryRequest) -> Result<Map<String, Value>, FetchError> {
        (**self).get_json(request).await
    }
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// `reqwest::Client` pools connections internally and is cheap to clone, so
/// one instance serves every concurrent load.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    max_response_bytes: usize,
}

impl ReqwestClient {
    /// Build a client from configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, config.max_response_bytes))
    }

    /// Wrap an application-owned client.
    pub fn with_client(client: Client, max_response_bytes: usize) -> Self {
        Self {
            client,
            max_response_bytes,
        }
    }

    fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    /// Read the body with a hard size cap. Content-Length is checked first,
    /// then the stream is cut off if it runs past the limit anyway.
    async fn read_body(&self, url: &str, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max = self.max_response_bytes;

        if let Some(len) = response.content_length()
            && len > max as u64
        {
            tracing::debug!(url, content_length = len, max, "Content-Length exceeds limit");
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                max,
            });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::transport_error(url, e))?;
            if body.len() + chunk.len() > max {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    max,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    /// Build the error for a non-success response. At most
    /// `max_response_bytes` of the body are read for the message; an empty
    /// or unreadable body falls back to the status reason phrase.
    async fn status_error(&self, url: &str, response: reqwest::Response) -> FetchError {
        let status = response.status();
        let max = self.max_response_bytes;

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while body.len() < max {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    let take = chunk.len().min(max - body.len());
                    body.extend_from_slice(&chunk[..take]);
                }
                Some(Err(e)) => {
                    tracing::debug!(url, error = %e, "Failed reading error body");
                    break;
                }
                None => break,
            }
        }

        let text = String::from_utf8_lossy(&body);
        let message = if text.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            text.trim().to_string()
        };

        FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_json(&self, request: &DiscoveryRequest) -> Result<Map<String, Value>, FetchError> {
        let url = request.as_str();

        let response = self
            .client
            .get(request.url().clone())
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        if !response.status().is_success() {
            return Err(self.status_error(url, response).await);
        }

        let body = self.read_body(url, response).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
