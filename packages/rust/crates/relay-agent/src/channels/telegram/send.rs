use super::TelegramChannel;
use super::chat::ChatRef;
use super::chunking::split_for_telegram;
use super::error::TelegramApiError;
use super::markdown::markdown_to_telegram_html;
use crate::observability::RelayEvent;

impl TelegramChannel {
    /// Send markdown `message` to `recipient` as HTML, split into parts when it is too long.
    ///
    /// Each part falls back to plain text on its own when Telegram rejects the markup.
    pub(super) async fn send_text(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        let chat = ChatRef::parse(recipient);
        let parts = split_for_telegram(message);
        if parts.len() > 1 {
            tracing::info!(
                parts = parts.len(),
                chars = message.chars().count(),
                "telegram message exceeds length limit; sending in parts"
            );
        }
        for part in &parts {
            self.send_part(&chat, part).await?;
        }
        Ok(())
    }

    async fn send_part(&self, chat: &ChatRef, part: &str) -> anyhow::Result<()> {
        let html_text = markdown_to_telegram_html(part);
        match self
            .send_message_with_backoff(chat, &html_text, Some("HTML"))
            .await
        {
            Ok(()) => Ok(()),
            Err(html_error) if html_error.should_retry_without_parse_mode() => {
                tracing::warn!(
                    event = RelayEvent::SendPlainFallback.as_str(),
                    error = %html_error,
                    "telegram HTML send rejected; retrying without parse_mode"
                );
                self.send_message_with_backoff(chat, part, None)
                    .await
                    .map_err(|plain_error| {
                        anyhow::anyhow!(
                            "Telegram sendMessage failed (html: {html_error}; plain fallback: {plain_error})"
                        )
                    })
            }
            Err(error) => Err(anyhow::anyhow!("Telegram sendMessage failed: {error}")),
        }
    }

    async fn send_message_with_backoff(
        &self,
        chat: &ChatRef,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), TelegramApiError> {
        let mut body = serde_json::json!({
            "chat_id": chat.to_api_value(),
            "text": text,
            "disable_web_page_preview": false,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = serde_json::json!(mode);
        }
        self.with_rate_limit_backoff("sendMessage", || self.call_api("sendMessage", &body))
            .await
            .map(|_| ())
    }
}
