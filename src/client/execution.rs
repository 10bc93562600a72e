//! Request execution logic (single attempt, no retry).

use tracing::{debug, info, warn};

use crate::stream::ChatCompletionStream;
use crate::transport::TransportResponse;
use crate::types::response::ChatCompletionResponse;
use crate::{Error, ErrorContext, Result};

use super::core::{ChatCompletion, PreparedRequest, RequestShaper};

impl RequestShaper {
    fn header_first(resp: &TransportResponse, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|n| resp.header(n))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub(crate) async fn dispatch(
        &self,
        prepared: PreparedRequest,
        model: &str,
    ) -> Result<ChatCompletion> {
        let PreparedRequest { request, plan } = prepared;

        debug!(
            model,
            initiator = plan.initiator.as_str(),
            vision = plan.vision,
            stream = plan.stream,
            request_id = plan.request_id.as_str(),
            "dispatching chat completions"
        );

        let start = std::time::Instant::now();
        let resp = self.transport.perform(request).await?;

        if !resp.status.is_success() {
            let status = resp.status.as_u16();
            let upstream = Self::header_first(&resp, &["x-github-request-id", "x-request-id"]);
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        http_status = status,
                        request_id = plan.request_id.as_str(),
                        error = %e,
                        "failed to read error response body"
                    );
                    String::new()
                }
            };

            info!(
                http_status = status,
                request_id = plan.request_id.as_str(),
                upstream_request_id = upstream.as_deref().unwrap_or(""),
                duration_ms = start.elapsed().as_millis() as u64,
                "chat completions request failed"
            );

            return Err(Error::Provider {
                status,
                body,
                request_id: upstream,
            });
        }

        if plan.stream {
            return Ok(ChatCompletion::Stream(ChatCompletionStream::from_body(
                resp.body,
                plan.request_id,
            )));
        }

        let bytes = resp.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes).map_err(|e| {
            let preview = String::from_utf8_lossy(&bytes[..bytes.len().min(120)]).into_owned();
            Error::parse_with_context(
                "response body is not a valid chat completion",
                ErrorContext::new()
                    .with_details(format!("{}; body starts with: {}", e, preview))
                    .with_source("response_parser"),
            )
        })?;

        debug!(
            request_id = plan.request_id.as_str(),
            choices = parsed.choices.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "chat completions request succeeded"
        );

        Ok(ChatCompletion::Complete(parsed))
    }
}
