use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

/// A failed Bot API call: transport error, HTTP error or `"ok": false` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramApiError {
    pub(super) status: Option<StatusCode>,
    pub(super) error_code: Option<i64>,
    pub(super) retry_after_secs: Option<u64>,
    pub(super) body: String,
}

impl TelegramApiError {
    pub(super) fn from_reqwest(err: &reqwest::Error) -> Self {
        let body = if err.is_timeout() {
            format!("timed out: {err}")
        } else {
            err.to_string()
        };
        Self::transport(body)
    }

    pub(super) fn transport(body: String) -> Self {
        Self {
            status: None,
            error_code: None,
            retry_after_secs: None,
            body,
        }
    }

    /// Build from a decoded error envelope.
    pub(super) fn from_envelope(
        status: Option<StatusCode>,
        data: Option<&serde_json::Value>,
        fallback_body: &str,
    ) -> Self {
        Self {
            status,
            error_code: data.and_then(telegram_api_error_code),
            retry_after_secs: data.and_then(telegram_api_error_retry_after_secs),
            body: data
                .map_or(fallback_body, |data| {
                    telegram_api_error_description(data, fallback_body)
                })
                .to_string(),
        }
    }

    /// HTTP status, when the request reached the server.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Bot API `error_code`.
    pub fn error_code(&self) -> Option<i64> {
        self.error_code
    }

    /// Flood-wait duration requested by the server.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_secs.map(Duration::from_secs)
    }

    /// Bot API description or transport error text.
    pub fn description(&self) -> &str {
        &self.body
    }

    /// Flood-wait (HTTP 429 / `error_code` 429).
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(StatusCode::TOO_MANY_REQUESTS) || self.error_code == Some(429)
    }

    /// Token rejected; polling cannot recover.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        ) || matches!(self.error_code, Some(401 | 403))
    }

    /// Another client is polling with the same token.
    pub fn is_conflict(&self) -> bool {
        self.status == Some(StatusCode::CONFLICT) || self.error_code == Some(409)
    }

    /// `retry_after` plus the fixed safety margin.
    pub fn rate_limit_delay(&self, margin: Duration) -> Duration {
        self.retry_after().unwrap_or_default() + margin
    }

    /// Bad request caused by the message markup rather than its content.
    pub(super) fn should_retry_without_parse_mode(&self) -> bool {
        let is_bad_request =
            self.status == Some(StatusCode::BAD_REQUEST) || self.error_code == Some(400);
        if !is_bad_request {
            return false;
        }
        let normalized = self.body.to_ascii_lowercase();
        [
            "can't parse",
            "can't find end tag",
            "unsupported start tag",
            "wrong entity",
        ]
        .iter()
        .any(|needle| normalized.contains(needle))
    }
}

impl fmt::Display for TelegramApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "status={status}, ")?;
        }
        if let Some(code) = self.error_code {
            write!(f, "error_code={code}, ")?;
        }
        if let Some(retry_after_secs) = self.retry_after_secs {
            write!(f, "retry_after={retry_after_secs}s, ")?;
        }
        f.write_str(&self.body)
    }
}

impl std::error::Error for TelegramApiError {}

pub(super) fn telegram_api_error_retry_after_secs(data: &serde_json::Value) -> Option<u64> {
    data.get("parameters")
        .and_then(|v| v.get("retry_after"))
        .and_then(serde_json::Value::as_u64)
}

pub(super) fn telegram_api_error_code(data: &serde_json::Value) -> Option<i64> {
    data.get("error_code").and_then(serde_json::Value::as_i64)
}

pub(super) fn telegram_api_error_description<'a>(
    data: &'a serde_json::Value,
    fallback: &'a str,
) -> &'a str {
    data.get("description")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}
