//! Chat message format (OpenAI-compatible)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tool::ToolCall;

/// A single turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    /// Absent and `null` both read as `None`; `None` is omitted on output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self::with_content(role, MessageContent::Text(text.into()))
    }

    pub fn with_content(role: MessageRole, content: MessageContent) -> Self {
        Self {
            role,
            content: Some(content),
            name: None,
            tool_calls: None,
            tool_call_id: None,
            extra: Map::new(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    /// A tool result answering the call identified by `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut msg = Self::new(MessageRole::Tool, text);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    pub fn contains_image(&self) -> bool {
        match &self.content {
            Some(MessageContent::Parts(parts)) => parts
                .iter()
                .any(|p| p.kind() == Some("image_url")),
            _ => false,
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Message content (can be string or array of content parts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn parts(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// Content part for multimodal messages.
///
/// Part types other than `text` and `image_url` (audio, files, ...) are kept
/// as raw objects so they reach the provider untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub enum ContentPart {
    Text {
        text: String,
        extra: Map<String, Value>,
    },
    ImageUrl {
        image_url: ImageUrl,
        extra: Map<String, Value>,
    },
    Other(Map<String, Value>),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// The part's `type` tag.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ContentPart::Text { .. } => Some("text"),
            ContentPart::ImageUrl { .. } => Some("image_url"),
            ContentPart::Other(map) => map.get("type").and_then(Value::as_str),
        }
    }
}

impl From<Map<String, Value>> for ContentPart {
    fn from(mut map: Map<String, Value>) -> Self {
        match map.get("type").and_then(Value::as_str) {
            Some("text") => match map.get("text") {
                Some(Value::String(text)) => {
                    let text = text.clone();
                    map.remove("type");
                    map.remove("text");
                    ContentPart::Text { text, extra: map }
                }
                _ => ContentPart::Other(map),
            },
            Some("image_url") => {
                let parsed = map
                    .get("image_url")
                    .cloned()
                    .map(serde_json::from_value::<ImageUrl>);
                match parsed {
                    Some(Ok(image_url)) => {
                        map.remove("type");
                        map.remove("image_url");
                        ContentPart::ImageUrl {
                            image_url,
                            extra: map,
                        }
                    }
                    _ => ContentPart::Other(map),
                }
            }
            _ => ContentPart::Other(map),
        }
    }
}

impl From<ContentPart> for Map<String, Value> {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::Text { text, mut extra } => {
                extra.insert("type".to_string(), Value::from("text"));
                extra.insert("text".to_string(), Value::String(text));
                extra
            }
            ContentPart::ImageUrl {
                image_url,
                mut extra,
            } => {
                extra.insert("type".to_string(), Value::from("image_url"));
                extra.insert("image_url".to_string(), Value::Object(image_url.into()));
                extra
            }
            ContentPart::Other(map) => map,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String, // https URL or data: URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<ImageUrl> for Map<String, Value> {
    fn from(image: ImageUrl) -> Self {
        let mut map = image.extra;
        map.insert("url".to_string(), Value::String(image.url));
        if let Some(detail) = image.detail {
            map.insert("detail".to_string(), Value::String(detail));
        }
        map
    }
}
