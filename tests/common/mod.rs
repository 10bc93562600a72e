//! Shared test fixtures: a recording in-process transport and log setup.

#![allow(dead_code)]

use bytes::Bytes;
use copilot_shaper::{
    AccountKind, OutboundRequest, RequestShaper, SessionContext, Transport, TransportError,
    TransportResponse,
};
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn() -> copilot_shaper::Result<TransportResponse> + Send + Sync>;

/// Transport that records every request and answers with a canned response.
pub struct RecordingTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    responder: Responder,
}

impl RecordingTransport {
    pub fn new(responder: Responder) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder,
        })
    }

    /// Always answer `status` with `body`.
    pub fn responding(status: u16, body: &'static str) -> Arc<Self> {
        Self::new(Box::new(move || {
            let status = StatusCode::from_u16(status).expect("valid status");
            Ok(TransportResponse::from_bytes(status, Bytes::from_static(body.as_bytes())))
        }))
    }

    /// Answer 200 with a minimal completion.
    pub fn ok() -> Arc<Self> {
        Self::responding(200, r#"{"id":"123","object":"chat.completion","choices":[]}"#)
    }

    /// Answer 200 with an event stream delivered in the given reads.
    pub fn event_stream(reads: Vec<&'static str>) -> Arc<Self> {
        Self::new(Box::new(move || {
            let chunks = reads.iter().map(|r| Bytes::from_static(r.as_bytes())).collect();
            Ok(TransportResponse::from_chunks(StatusCode::OK, chunks))
        }))
    }

    /// Fail every call before a response exists.
    pub fn unreachable() -> Arc<Self> {
        Self::new(Box::new(|| {
            Err(TransportError::Other("connection refused".to_string()).into())
        }))
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> OutboundRequest {
        self.requests()
            .pop()
            .expect("transport was never called")
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn perform(&self, request: OutboundRequest) -> copilot_shaper::Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        (self.responder)()
    }
}

pub fn shaper_with(transport: Arc<RecordingTransport>) -> RequestShaper {
    RequestShaper::builder()
        .transport(transport)
        .build()
        .expect("shaper builds")
}

pub fn session() -> SessionContext {
    SessionContext::new("test-token", "1.0.0", AccountKind::Individual)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
