//! Outbound request shaping observed at the transport boundary.

mod common;

use common::{init_tracing, session, shaper_with, RecordingTransport};
use copilot_shaper::types::{ContentPart, MessageContent};
use copilot_shaper::{
    AccountKind, ChatCompletion, ChatCompletionsPayload, Error, Message, MessageRole,
    SessionContext, ToolDefinition,
};
use serde_json::json;

#[tokio::test]
async fn tool_message_sets_agent_initiator() -> anyhow::Result<()> {
    init_tracing();
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new(
        "gpt-test",
        vec![Message::user("hi"), Message::tool("call_1", "tool call")],
    );
    shaper.create_chat_completions(&session(), &payload).await?;

    assert_eq!(transport.last().header("X-Initiator"), Some("agent"));
    Ok(())
}

#[tokio::test]
async fn user_only_history_sets_user_initiator() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new(
        "gpt-test",
        vec![Message::user("hi"), Message::user("hello again")],
    );
    shaper.create_chat_completions(&session(), &payload).await?;

    assert_eq!(transport.last().header("X-Initiator"), Some("user"));
    Ok(())
}

#[tokio::test]
async fn each_call_is_classified_independently() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let agent = ChatCompletionsPayload::new(
        "gpt-test",
        vec![Message::user("hi"), Message::assistant("hello")],
    );
    let user = ChatCompletionsPayload::new("gpt-test", vec![Message::user("fresh start")]);

    shaper.create_chat_completions(&session(), &agent).await?;
    shaper.create_chat_completions(&session(), &user).await?;

    let initiators: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.header("x-initiator").map(str::to_string))
        .collect();
    assert_eq!(
        initiators,
        vec![Some("agent".to_string()), Some("user".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn mcp_tool_schema_gets_empty_properties() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]).tools(vec![
        ToolDefinition::function("mcp__example", json!({"type": "object"})),
        ToolDefinition::function(
            "read_file",
            json!({
                "type": "object",
                "properties": {"path": {"type": "string"}},
                "required": ["path"]
            }),
        ),
    ]);
    shaper.create_chat_completions(&session(), &payload).await?;

    let body = transport.last().json_body()?;
    assert_eq!(
        body["tools"][0]["function"]["parameters"],
        json!({"type": "object", "properties": {}})
    );
    assert_eq!(
        body["tools"][1]["function"]["parameters"],
        json!({
            "type": "object",
            "properties": {"path": {"type": "string"}},
            "required": ["path"]
        })
    );

    // The caller's copy is not touched.
    assert_eq!(
        payload.tools.as_ref().unwrap()[0].function.parameters,
        Some(json!({"type": "object"}))
    );
    Ok(())
}

#[tokio::test]
async fn absent_tools_stay_absent_on_the_wire() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]);
    shaper.create_chat_completions(&session(), &payload).await?;

    let body = transport.last().json_body()?;
    assert!(body.get("tools").is_none());
    Ok(())
}

#[tokio::test]
async fn passthrough_fields_reach_the_body() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload: ChatCompletionsPayload = serde_json::from_value(json!({
        "model": "gpt-test",
        "messages": [{"role": "user", "content": "hi"}],
        "temperature": 0.1,
        "top_p": 1,
        "max_tokens": 64,
        "tool_choice": "auto",
        "x-custom": {"nested": true}
    }))?;
    shaper.create_chat_completions(&session(), &payload).await?;

    let body = transport.last().json_body()?;
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["temperature"], 0.1);
    assert_eq!(body["top_p"], 1);
    assert_eq!(body["max_tokens"], 64);
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(body["x-custom"], json!({"nested": true}));
    assert_eq!(body["messages"], json!([{"role": "user", "content": "hi"}]));
    Ok(())
}

#[tokio::test]
async fn wire_contract_headers_and_url() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]);
    shaper.create_chat_completions(&session(), &payload).await?;

    let req = transport.last();
    assert_eq!(req.method, reqwest::Method::POST);
    assert_eq!(req.url.as_str(), "https://api.githubcopilot.com/chat/completions");
    assert_eq!(req.header("authorization"), Some("Bearer test-token"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("editor-version"), Some("vscode/1.0.0"));
    assert_eq!(req.header("x-account-type"), Some("individual"));
    assert!(req.header("editor-plugin-version").is_some());
    assert!(req.header("copilot-vision-request").is_none());

    let request_id = req.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
    Ok(())
}

#[tokio::test]
async fn request_ids_are_fresh_per_call() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());
    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]);

    shaper.create_chat_completions(&session(), &payload).await?;
    shaper.create_chat_completions(&session(), &payload).await?;

    let ids: Vec<String> = transport
        .requests()
        .iter()
        .filter_map(|r| r.header("x-request-id").map(str::to_string))
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    Ok(())
}

#[tokio::test]
async fn business_account_uses_its_own_host() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());
    let session = SessionContext::new("test-token", "1.0.0", AccountKind::Business);

    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]);
    shaper.create_chat_completions(&session, &payload).await?;

    let req = transport.last();
    assert_eq!(
        req.url.as_str(),
        "https://api.business.githubcopilot.com/chat/completions"
    );
    assert_eq!(req.header("x-account-type"), Some("business"));
    Ok(())
}

#[tokio::test]
async fn image_content_sets_vision_header() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new(
        "gpt-test",
        vec![Message::with_content(
            MessageRole::User,
            MessageContent::parts(vec![
                ContentPart::text("what is in this picture?"),
                ContentPart::image_url("data:image/png;base64,iVBORw0KGgo="),
            ]),
        )],
    );
    shaper.create_chat_completions(&session(), &payload).await?;

    let req = transport.last();
    assert_eq!(req.header("copilot-vision-request"), Some("true"));
    assert_eq!(req.header("x-initiator"), Some("user"));
    let body = req.json_body()?;
    assert_eq!(body["messages"][0]["content"][1]["type"], "image_url");
    Ok(())
}

#[tokio::test]
async fn missing_credential_fails_before_any_io() {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());
    let session = SessionContext::new("", "1.0.0", AccountKind::Individual);

    let payload = ChatCompletionsPayload::new("gpt-test", vec![Message::user("hi")]);
    let err = shaper
        .create_chat_completions(&session, &payload)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn prepare_builds_without_sending() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload = ChatCompletionsPayload::new(
        "gpt-test",
        vec![Message::user("hi"), Message::tool("call_1", "done")],
    )
    .stream();
    let prepared = shaper.prepare(&session(), &payload)?;

    assert!(prepared.plan.stream);
    assert_eq!(prepared.request.header("accept"), Some("text/event-stream"));
    assert_eq!(prepared.request.header("x-initiator"), Some("agent"));
    assert_eq!(prepared.request.json_body()?["stream"], true);
    assert!(transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn completion_is_returned_as_parsed() -> anyhow::Result<()> {
    let transport = RecordingTransport::responding(
        200,
        r#"{
            "id": "chatcmpl-9",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi there"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7},
            "prompt_filter_results": []
        }"#,
    );
    let shaper = shaper_with(transport);

    let payload = ChatCompletionsPayload::new("gpt-4o", vec![Message::user("hi")]);
    let resp = match shaper.create_chat_completions(&session(), &payload).await? {
        ChatCompletion::Complete(resp) => resp,
        ChatCompletion::Stream(_) => panic!("expected a complete response"),
    };

    assert_eq!(resp.id, "chatcmpl-9");
    assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
    assert_eq!(resp.usage.as_ref().map(|u| u.total_tokens), Some(7));
    assert!(resp.extra.contains_key("prompt_filter_results"));
    Ok(())
}

#[tokio::test]
async fn nested_passthrough_fields_reach_the_body() -> anyhow::Result<()> {
    let transport = RecordingTransport::ok();
    let shaper = shaper_with(transport.clone());

    let payload: ChatCompletionsPayload = serde_json::from_value(json!({
        "model": "gpt-test",
        "messages": [
            {
                "role": "user",
                "content": [
                    {"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}},
                    {"type": "input_audio", "input_audio": {"data": "AAAA", "format": "wav"}}
                ]
            },
            {
                "role": "assistant",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "x", "arguments": "{}", "x-fn": 1},
                    "x-call": 2
                }]
            }
        ],
        "tools": [{
            "type": "function",
            "function": {"name": "x", "parameters": {"type": "object"}},
            "cache_control": {"type": "ephemeral"}
        }]
    }))?;
    shaper.create_chat_completions(&session(), &payload).await?;

    let body = transport.last().json_body()?;
    assert_eq!(
        body["tools"][0],
        json!({
            "type": "function",
            "function": {"name": "x", "parameters": {"type": "object", "properties": {}}},
            "cache_control": {"type": "ephemeral"}
        })
    );
    assert_eq!(
        body["messages"][0]["content"][0],
        json!({"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}})
    );
    assert_eq!(
        body["messages"][0]["content"][1],
        json!({"type": "input_audio", "input_audio": {"data": "AAAA", "format": "wav"}})
    );
    assert!(body["messages"][1].get("content").is_none());
    assert_eq!(body["messages"][1]["tool_calls"][0]["x-call"], 2);
    assert_eq!(body["messages"][1]["tool_calls"][0]["function"]["x-fn"], 1);

    let req = transport.last();
    assert_eq!(req.header("x-initiator"), Some("agent"));
    assert!(req.header("copilot-vision-request").is_none());
    Ok(())
}
