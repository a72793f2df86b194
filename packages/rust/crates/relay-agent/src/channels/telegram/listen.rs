use std::time::Duration;

use tokio::sync::mpsc;

use crate::channels::traits::InboundMessage;
use crate::observability::RelayEvent;

use super::TelegramChannel;
use super::constants::{
    TELEGRAM_ALLOWED_UPDATES, TELEGRAM_POLL_CONFLICT_RETRY_SECS,
    TELEGRAM_POLL_DEFAULT_RATE_LIMIT_RETRY_SECS, TELEGRAM_POLL_MAX_RATE_LIMIT_RETRY_SECS,
    TELEGRAM_POLL_RETRY_SECS,
};

impl TelegramChannel {
    pub(super) async fn listen_updates(
        &self,
        tx: mpsc::Sender<InboundMessage>,
    ) -> anyhow::Result<()> {
        let mut offset: i64 = 0;
        tracing::info!(
            event = RelayEvent::ListenStarted.as_str(),
            source = %self.source,
            poll_timeout_secs = self.poll_timeout_secs,
            "telegram channel listening for source posts"
        );
        loop {
            let body = serde_json::json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": TELEGRAM_ALLOWED_UPDATES,
            });
            let updates = match self.call_api("getUpdates", &body).await {
                Ok(updates) => updates,
                Err(error) if error.is_unauthorized() => {
                    anyhow::bail!("Telegram getUpdates rejected the bot token: {error}");
                }
                Err(error) if error.is_conflict() => {
                    tracing::warn!(
                        error = %error,
                        "telegram polling conflict; ensure only one process uses this bot token"
                    );
                    tokio::time::sleep(Duration::from_secs(TELEGRAM_POLL_CONFLICT_RETRY_SECS))
                        .await;
                    continue;
                }
                Err(error) if error.is_rate_limited() => {
                    let retry_after_secs = error
                        .retry_after()
                        .map_or(TELEGRAM_POLL_DEFAULT_RATE_LIMIT_RETRY_SECS, |delay| {
                            delay.as_secs()
                        })
                        .clamp(1, TELEGRAM_POLL_MAX_RATE_LIMIT_RETRY_SECS);
                    tracing::warn!(
                        event = RelayEvent::RateLimitWait.as_str(),
                        retry_after_secs,
                        error = %error,
                        "telegram getUpdates rate limited"
                    );
                    tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                    continue;
                }
                Err(error) => {
                    tracing::warn!(error = %error, "telegram getUpdates failed; retrying");
                    tokio::time::sleep(Duration::from_secs(TELEGRAM_POLL_RETRY_SECS)).await;
                    continue;
                }
            };

            let Some(results) = updates.as_array() else {
                continue;
            };
            for update in results {
                if let Some(update_id) = update.get("update_id").and_then(serde_json::Value::as_i64)
                {
                    offset = update_id + 1;
                }
                let Some(message) = self.parse_update_message(update) else {
                    continue;
                };
                tracing::debug!(
                    event = RelayEvent::MessageReceived.as_str(),
                    message_id = message.message_id,
                    chat_id = message.chat_id,
                    "telegram source post received"
                );
                if tx.send(message).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}
