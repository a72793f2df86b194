use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use super::chat::ChatRef;
use super::client::build_telegram_http_client;
use super::constants::{
    TELEGRAM_DEFAULT_API_BASE, TELEGRAM_DEFAULT_POLL_TIMEOUT_SECS, TELEGRAM_RATE_LIMIT_MARGIN,
};

/// Telegram channel: long-polls the Bot API for source posts and sends to any chat.
pub struct TelegramChannel {
    pub(super) bot_token: String,
    pub(super) api_base_url: String,
    pub(super) source: ChatRef,
    pub(super) source_chat_id: RwLock<Option<i64>>,
    pub(super) poll_timeout_secs: u64,
    pub(super) rate_limit_margin: Duration,
    pub(super) client: reqwest::Client,
}

impl TelegramChannel {
    /// Channel against the public Bot API.
    pub fn new(bot_token: impl Into<String>, source: ChatRef) -> Self {
        Self::with_base_url(bot_token, source, TELEGRAM_DEFAULT_API_BASE)
    }

    /// Channel against a custom Bot API base URL (local Bot API server, test doubles).
    pub fn with_base_url(
        bot_token: impl Into<String>,
        source: ChatRef,
        api_base_url: impl Into<String>,
    ) -> Self {
        let source_chat_id = match &source {
            ChatRef::Id(id) => Some(*id),
            ChatRef::Username(_) => None,
        };
        Self {
            bot_token: bot_token.into(),
            api_base_url: api_base_url.into(),
            source,
            source_chat_id: RwLock::new(source_chat_id),
            poll_timeout_secs: TELEGRAM_DEFAULT_POLL_TIMEOUT_SECS,
            rate_limit_margin: TELEGRAM_RATE_LIMIT_MARGIN,
            client: build_telegram_http_client(TELEGRAM_DEFAULT_POLL_TIMEOUT_SECS),
        }
    }

    /// Long-poll timeout passed to `getUpdates`; the HTTP client timeout follows it.
    #[must_use]
    pub fn with_poll_timeout_secs(mut self, poll_timeout_secs: u64) -> Self {
        self.poll_timeout_secs = poll_timeout_secs;
        self.client = build_telegram_http_client(poll_timeout_secs);
        self
    }

    /// Extra wait added on top of a flood-wait `retry_after`.
    #[must_use]
    pub fn with_rate_limit_margin(mut self, margin: Duration) -> Self {
        self.rate_limit_margin = margin;
        self
    }

    /// Configured source chat.
    pub fn source(&self) -> &ChatRef {
        &self.source
    }

    /// Numeric id of the source chat, once known.
    pub fn source_chat_id(&self) -> Option<i64> {
        *self
            .source_chat_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn set_source_chat_id(&self, chat_id: i64) {
        *self
            .source_chat_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(chat_id);
    }

    pub(super) fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token
        )
    }
}
