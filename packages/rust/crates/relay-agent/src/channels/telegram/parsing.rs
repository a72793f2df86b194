use crate::channels::traits::InboundMessage;

use super::TelegramChannel;

impl TelegramChannel {
    /// Turn an update into a source message; `None` for other chats or unsupported updates.
    pub fn parse_update_message(&self, update: &serde_json::Value) -> Option<InboundMessage> {
        let message = update
            .get("channel_post")
            .or_else(|| update.get("message"))?;
        let message_id = message
            .get("message_id")
            .and_then(serde_json::Value::as_i64)?;
        let chat = message.get("chat")?;
        let chat_id = chat.get("id").and_then(serde_json::Value::as_i64)?;
        let username = chat.get("username").and_then(serde_json::Value::as_str);

        let from_source = self
            .source_chat_id()
            .is_some_and(|source_id| source_id == chat_id)
            || self.source.matches(chat_id, username);
        if !from_source {
            tracing::debug!(
                chat_id,
                username = username.unwrap_or("(not set)"),
                source = %self.source,
                "telegram update ignored: not from source chat"
            );
            return None;
        }

        let text = message
            .get("text")
            .or_else(|| message.get("caption"))
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        Some(InboundMessage {
            message_id,
            chat_id,
            text,
        })
    }
}
