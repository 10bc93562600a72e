use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use uuid::Uuid;

use crate::client::headers::{build_headers, RequestPlan};
use crate::profile::ProviderProfile;
use crate::session::SessionContext;
use crate::shaping;
use crate::stream::ChatCompletionStream;
use crate::transport::{OutboundRequest, Transport};
use crate::types::request::ChatCompletionsPayload;
use crate::types::response::ChatCompletionResponse;
use crate::Result;

/// Shapes chat-completions payloads and dispatches them through a [`Transport`].
///
/// Stateless between calls: the only shared pieces are the transport and an
/// immutable profile, so one shaper can serve any number of concurrent calls.
#[derive(Clone)]
pub struct RequestShaper {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) profile: Arc<ProviderProfile>,
}

/// Result of a chat-completions call.
#[derive(Debug)]
pub enum ChatCompletion {
    /// `stream` was unset or false.
    Complete(ChatCompletionResponse),
    /// `stream: true`; chunks are pulled lazily.
    Stream(ChatCompletionStream),
}

impl ChatCompletion {
    pub fn into_complete(self) -> Option<ChatCompletionResponse> {
        match self {
            ChatCompletion::Complete(resp) => Some(resp),
            ChatCompletion::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<ChatCompletionStream> {
        match self {
            ChatCompletion::Stream(s) => Some(s),
            ChatCompletion::Complete(_) => None,
        }
    }
}

/// A fully assembled request together with the facts used to shape it.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub request: OutboundRequest,
    pub plan: RequestPlan,
}

impl RequestShaper {
    /// Shaper over a default [`crate::transport::HttpTransport`] and the built-in profile.
    pub fn new() -> Result<Self> {
        crate::client::builder::RequestShaperBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::RequestShaperBuilder {
        crate::client::builder::RequestShaperBuilder::new()
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Assemble the outbound request without sending it.
    ///
    /// `payload` is left untouched; tool schemas are repaired on a copy.
    pub fn prepare(
        &self,
        session: &SessionContext,
        payload: &ChatCompletionsPayload,
    ) -> Result<PreparedRequest> {
        session.ensure_credential()?;

        let plan = RequestPlan {
            initiator: shaping::classify(&payload.messages),
            vision: shaping::requires_vision(&payload.messages),
            stream: payload.is_streaming(),
            request_id: Uuid::new_v4().to_string(),
        };

        let mut body = payload.clone();
        shaping::normalize_tools(&mut body.tools);
        let body = Bytes::from(serde_json::to_vec(&body)?);

        let request = OutboundRequest {
            method: Method::POST,
            url: self.profile.chat_completions_url(session.account_kind)?,
            headers: build_headers(session, &self.profile, &plan)?,
            body,
        };

        Ok(PreparedRequest { request, plan })
    }

    /// Shape `payload`, send it, and parse the response.
    ///
    /// Failures are returned as they happen, with no retry: [`crate::Error::Transport`]
    /// if the call could not complete, [`crate::Error::Provider`] for a non-2xx
    /// status, [`crate::Error::Parse`] for a 2xx body that is not a completion.
    pub async fn create_chat_completions(
        &self,
        session: &SessionContext,
        payload: &ChatCompletionsPayload,
    ) -> Result<ChatCompletion> {
        let prepared = self.prepare(session, payload)?;
        self.dispatch(prepared, &payload.model).await
    }
}
