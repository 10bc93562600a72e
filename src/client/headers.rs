//! Outbound header assembly.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};

use crate::profile::ProviderProfile;
use crate::session::SessionContext;
use crate::shaping::Initiator;
use crate::{Error, ErrorContext, Result};

pub const X_INITIATOR: &str = "x-initiator";
pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_ACCOUNT_TYPE: &str = "x-account-type";
pub const COPILOT_VISION_REQUEST: &str = "copilot-vision-request";

/// Per-call facts derived from the payload that end up as headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    pub initiator: Initiator,
    pub vision: bool,
    pub stream: bool,
    pub request_id: String,
}

/// Build the full header set for one chat-completions call.
pub fn build_headers(
    session: &SessionContext,
    profile: &ProviderProfile,
    plan: &RequestPlan,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        value("authorization", format!("Bearer {}", session.credential))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(if plan.stream {
            "text/event-stream"
        } else {
            "application/json"
        }),
    );
    headers.insert(
        name("copilot-integration-id"),
        value("profile.integration_id", &profile.integration_id)?,
    );
    headers.insert(
        name("editor-version"),
        value(
            "session.client_version_tag",
            format!("vscode/{}", session.client_version_tag),
        )?,
    );
    headers.insert(
        name("editor-plugin-version"),
        value("profile.plugin_version", profile.editor_plugin_version())?,
    );
    headers.insert(USER_AGENT, value("profile.plugin_version", profile.user_agent())?);
    headers.insert(
        name("openai-intent"),
        value("profile.openai_intent", &profile.openai_intent)?,
    );
    headers.insert(
        name("x-github-api-version"),
        value("profile.api_version", &profile.api_version)?,
    );
    headers.insert(
        name("x-vscode-user-agent-library-version"),
        value("profile.user_agent_library", &profile.user_agent_library)?,
    );
    headers.insert(
        name(X_ACCOUNT_TYPE),
        HeaderValue::from_static(session.account_kind.as_str()),
    );
    headers.insert(name(X_REQUEST_ID), value("request_id", &plan.request_id)?);
    headers.insert(
        name(X_INITIATOR),
        HeaderValue::from_static(plan.initiator.as_str()),
    );

    if plan.vision {
        headers.insert(name(COPILOT_VISION_REQUEST), HeaderValue::from_static("true"));
    }

    Ok(headers)
}

fn name(raw: &'static str) -> HeaderName {
    HeaderName::from_static(raw)
}

fn value(field: &str, raw: impl AsRef<str>) -> Result<HeaderValue> {
    HeaderValue::from_str(raw.as_ref()).map_err(|_| {
        Error::configuration_with_context(
            "value cannot be sent as an HTTP header",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("header_builder"),
        )
    })
}
