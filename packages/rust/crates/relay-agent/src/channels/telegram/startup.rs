use std::future::Future;

use crate::observability::RelayEvent;

use super::TelegramChannel;
use super::chat::ChatRef;
use super::error::TelegramApiError;

/// Who the bot is and which chat it listens to, confirmed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Bot user id.
    pub bot_id: i64,
    /// Bot `@username` (without `@`), when set.
    pub bot_username: Option<String>,
    /// Numeric id of the source chat.
    pub source_chat_id: i64,
    /// Source chat title, when set.
    pub source_title: Option<String>,
}

impl TelegramChannel {
    /// Run `call`; on a flood-wait, sleep `retry_after` plus the margin and run it once more.
    ///
    /// The second outcome is returned as-is, so a repeated flood-wait surfaces to the caller.
    pub(super) async fn with_rate_limit_backoff<T, F, Fut>(
        &self,
        operation: &str,
        mut call: F,
    ) -> Result<T, TelegramApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TelegramApiError>>,
    {
        match call().await {
            Err(error) if error.is_rate_limited() => {
                let delay = error.rate_limit_delay(self.rate_limit_margin);
                tracing::warn!(
                    event = RelayEvent::RateLimitWait.as_str(),
                    operation,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "telegram rate limit hit; waiting before a single retry"
                );
                tokio::time::sleep(delay).await;
                call().await
            }
            outcome => outcome,
        }
    }

    /// Verify the token (`getMe`) and resolve the source chat (`getChat`).
    pub async fn startup(&self) -> anyhow::Result<BotIdentity> {
        let no_params = serde_json::json!({});
        let me = self
            .with_rate_limit_backoff("getMe", || self.call_api("getMe", &no_params))
            .await
            .map_err(|error| anyhow::anyhow!("Telegram getMe failed: {error}"))?;
        let bot_id = me
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| anyhow::anyhow!("Telegram getMe returned no bot id"))?;
        let bot_username = me
            .get("username")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        let chat_request = serde_json::json!({ "chat_id": self.source.to_api_value() });
        let chat = self
            .with_rate_limit_backoff("getChat", || self.call_api("getChat", &chat_request))
            .await
            .map_err(|error| {
                anyhow::anyhow!("Telegram getChat failed for {}: {error}", self.source)
            })?;
        let source_chat_id = chat
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .or(match self.source {
                ChatRef::Id(id) => Some(id),
                ChatRef::Username(_) => None,
            })
            .ok_or_else(|| anyhow::anyhow!("Telegram getChat returned no chat id"))?;
        self.set_source_chat_id(source_chat_id);
        let source_title = chat
            .get("title")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);

        tracing::info!(
            event = RelayEvent::StartupReady.as_str(),
            bot_id,
            bot_username = bot_username.as_deref().unwrap_or("(not set)"),
            source = %self.source,
            source_chat_id,
            source_title = source_title.as_deref().unwrap_or("(not set)"),
            "telegram bot ready"
        );

        Ok(BotIdentity {
            bot_id,
            bot_username,
            source_chat_id,
            source_title,
        })
    }
}
