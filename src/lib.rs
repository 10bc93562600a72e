//! # copilot-shaper
//!
//! Request-shaping layer for Copilot-style chat-completions endpoints.
//!
//! ## Overview
//!
//! A caller hands over an OpenAI-compatible [`ChatCompletionsPayload`] and a
//! [`SessionContext`]; the shaper
//!
//! 1. attributes the call to an agent or a user (`X-Initiator`),
//! 2. repairs tool parameter schemas the provider would reject,
//! 3. sends one `POST <host>/chat/completions` through an injected
//!    [`Transport`], and
//! 4. returns the parsed completion, or a lazy chunk stream when
//!    `stream: true` was requested.
//!
//! Token acquisition, retries, rate limiting and conversation storage are
//! left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use copilot_shaper::{
//!     AccountKind, ChatCompletion, ChatCompletionsPayload, Message, RequestShaper, SessionContext,
//! };
//!
//! #[tokio::main]
//! async fn main() -> copilot_shaper::Result<()> {
//!     let shaper = RequestShaper::new()?;
//!     let session = SessionContext::new("copilot-token", "1.99.0", AccountKind::Individual);
//!
//!     let payload = ChatCompletionsPayload::new("gpt-4o", vec![Message::user("Hello!")]);
//!     if let ChatCompletion::Complete(resp) = shaper.create_chat_completions(&session, &payload).await? {
//!         println!("{:?}", resp.choices.first().map(|c| &c.message.content));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`RequestShaper`], header assembly, dispatch |
//! | [`shaping`] | Pure transformations: initiator, schema repair, vision flag |
//! | [`transport`] | [`Transport`] seam and the `reqwest` implementation |
//! | [`stream`] | SSE decoding and [`ChatCompletionStream`] |
//! | [`types`] | Payload, message, tool and response types |
//! | [`profile`] | Provider host layout and editor-identification constants |
//! | [`session`] | Per-call [`SessionContext`] |

pub mod client;
pub mod profile;
pub mod session;
pub mod shaping;
pub mod stream;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{ChatCompletion, PreparedRequest, RequestShaper, RequestShaperBuilder};
pub use profile::ProviderProfile;
pub use session::{AccountKind, SessionContext};
pub use shaping::Initiator;
pub use stream::ChatCompletionStream;
pub use transport::{HttpTransport, OutboundRequest, Transport, TransportError, TransportResponse};
pub use types::{
    ChatCompletionChunk, ChatCompletionResponse, ChatCompletionsPayload, Message, MessageRole,
    ToolDefinition,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
