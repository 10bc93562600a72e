//! Wire types for the chat-completions protocol.
//!
//! # Types Module
//!
//! Strongly-typed representations of what flows through the shaper: the
//! caller's [`ChatCompletionsPayload`], the [`Message`] history inside it, the
//! [`ToolDefinition`]s it offers, and the provider's responses.
//!
//! Every struct that mirrors a provider object keeps an `extra` map flattened
//! into it, so fields this crate does not model survive a decode/encode pass
//! untouched.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ChatCompletionsPayload`] | Outbound request body |
//! | [`Message`] | Chat message with role and content |
//! | [`MessageRole`] | Message role (system, user, assistant, tool) |
//! | [`ToolDefinition`] | Tool declaration offered to the model |
//! | [`ChatCompletionResponse`] | Non-streaming response |
//! | [`ChatCompletionChunk`] | One streamed delta |
//!
//! ## Example
//!
//! ```rust
//! use copilot_shaper::types::{ChatCompletionsPayload, Message, ToolDefinition};
//!
//! let payload = ChatCompletionsPayload::new(
//!     "gpt-4o",
//!     vec![Message::system("Be terse."), Message::user("What's the weather?")],
//! )
//! .tools(vec![ToolDefinition::function(
//!     "get_weather",
//!     serde_json::json!({"type": "object"}),
//! )]);
//! assert!(!payload.is_streaming());
//! ```

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{ContentPart, ImageUrl, Message, MessageContent, MessageRole};
pub use request::ChatCompletionsPayload;
pub use response::{
    ChatCompletionChunk, ChatCompletionResponse, Choice, ChunkChoice, Delta, DeltaFunction,
    DeltaToolCall, ResponseMessage, Usage,
};
pub use tool::{FunctionCall, FunctionDefinition, ToolCall, ToolDefinition};
