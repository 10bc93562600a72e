use crate::transport::{OutboundRequest, Transport, TransportError, TransportResponse};
use crate::Result;
use futures::TryStreamExt;
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use tracing::debug;

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with env-overridable defaults.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Like [`HttpTransport::new`], but an explicit timeout beats `COPILOT_HTTP_TIMEOUT_SECS`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        // Completions can take a while to start streaming; keep the default generous.
        let timeout = timeout.unwrap_or_else(|| {
            Duration::from_secs(
                env::var("COPILOT_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(120),
            )
        });

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("COPILOT_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Ok(proxy_url) = env::var("COPILOT_PROXY_URL") {
            let proxy = Proxy::all(&proxy_url)
                .map_err(|e| TransportError::Other(format!("invalid COPILOT_PROXY_URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: OutboundRequest) -> Result<TransportResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let resp = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes_stream()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)));

        Ok(TransportResponse::new(status, headers, Box::pin(body)))
    }
}
