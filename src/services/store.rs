use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

/// The byte stream handed to the response body.
pub type MediaStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Metadata for a stored object, from the store's metadata endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectMetadata {
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// An in-flight upstream byte fetch.
///
/// Status and headers are kept as plain values so the gateway can reconcile
/// them before anything is written to the client.
pub struct MediaFetch {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_range: Option<String>,
    pub body: MediaStream,
}

/// The upstream content store holding hosted video files.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Resolves a reference to its display name, MIME type, and size.
    async fn metadata(&self, reference: &str) -> Result<ObjectMetadata>;

    /// Starts the byte fetch, forwarding `range` verbatim when present.
    async fn fetch(&self, reference: &str, range: Option<&str>) -> Result<MediaFetch>;
}

/// HTTP adapter for the upstream content store.
pub struct HttpContentStore {
    client: reqwest::Client,
    base_url: String,
    token: Zeroizing<String>,
}

impl HttpContentStore {
    pub fn new(client: reqwest::Client, base_url: String, token: Zeroizing<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn metadata(&self, reference: &str) -> Result<ObjectMetadata> {
        let res = self
            .client
            .get(format!("{}/files/{}/metadata", self.base_url, reference))
            .bearer_auth(self.token.as_str())
            .send()
            .await?
            .error_for_status()?;

        res.json::<ObjectMetadata>()
            .await
            .map_err(|e| AppError::Internal(format!("Malformed store metadata: {}", e)))
    }

    async fn fetch(&self, reference: &str, range: Option<&str>) -> Result<MediaFetch> {
        let mut req = self
            .client
            .get(format!("{}/files/{}?alt=media", self.base_url, reference))
            .bearer_auth(self.token.as_str());

        if let Some(range) = range {
            req = req.header(reqwest::header::RANGE, range);
        }

        let res = req.send().await?;

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = res
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let content_range = res
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: MediaStream = Box::pin(res.bytes_stream().map(|chunk| {
            chunk.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
        }));

        Ok(MediaFetch {
            status,
            content_type,
            content_length,
            content_range,
            body,
        })
    }
}
