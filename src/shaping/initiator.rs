//! Attribution of a conversation to a human or to an autonomous actor.

use std::fmt;

use crate::types::message::{Message, MessageRole};

/// Value of the `X-Initiator` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Initiator {
    /// An assistant or tool turn appears somewhere in the history.
    Agent,
    /// Only user/system turns (or nothing at all).
    User,
}

impl Initiator {
    pub fn as_str(self) -> &'static str {
        match self {
            Initiator::Agent => "agent",
            Initiator::User => "user",
        }
    }
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a message history.
///
/// Any `assistant` or `tool` message anywhere in `messages` makes the call
/// agent-initiated; position does not matter. An empty history is a user call.
pub fn classify(messages: &[Message]) -> Initiator {
    let agent_seen = messages
        .iter()
        .any(|m| matches!(m.role, MessageRole::Assistant | MessageRole::Tool));

    if agent_seen {
        Initiator::Agent
    } else {
        Initiator::User
    }
}
