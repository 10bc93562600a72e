//! HTTP boundary.
//!
//! The dispatcher never talks to `reqwest` directly; it hands a fully built
//! [`OutboundRequest`] to a [`Transport`] and gets back status, headers and a
//! lazily-pulled body. Tests substitute their own `Transport` to observe the
//! exact wire request without a network.

pub mod http;

pub use http::HttpTransport;

use bytes::Bytes;
use futures::{stream, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::{BoxStream, Result};

/// A request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    /// Header value as a string, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body decoded as JSON.
    pub fn json_body(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Response head plus a body that is read on demand.
///
/// Dropping the value (or the body stream) releases the underlying connection.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Bytes>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: BoxStream<'static, Bytes>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with a fully buffered body.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::from_chunks(status, vec![body.into()])
    }

    /// Response whose body arrives as the given sequence of reads.
    pub fn from_chunks(status: StatusCode, chunks: Vec<Bytes>) -> Self {
        let body = stream::iter(chunks.into_iter().map(Ok));
        Self::new(status, HeaderMap::new(), Box::pin(body))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Drain the whole body.
    pub async fn bytes(self) -> Result<Bytes> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        if chunks.len() == 1 {
            return Ok(chunks.into_iter().next().unwrap_or_default());
        }
        let mut buf = Vec::with_capacity(chunks.iter().map(Bytes::len).sum());
        for chunk in chunks {
            buf.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(buf))
    }

    /// Drain the whole body as (lossy) UTF-8.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// The single capability the dispatcher needs from the network.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: OutboundRequest) -> Result<TransportResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
