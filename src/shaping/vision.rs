use crate::types::message::Message;

/// Whether any message carries an `image_url` part.
pub fn requires_vision(messages: &[Message]) -> bool {
    messages.iter().any(Message::contains_image)
}
