use std::time::Duration;

use super::TelegramChannel;
use super::constants::{
    TELEGRAM_HTTP_CONNECT_TIMEOUT_SECS, TELEGRAM_HTTP_REQUEST_TIMEOUT_MARGIN_SECS,
};
use super::error::TelegramApiError;

pub(super) fn build_telegram_http_client(poll_timeout_secs: u64) -> reqwest::Client {
    let request_timeout = poll_timeout_secs + TELEGRAM_HTTP_REQUEST_TIMEOUT_MARGIN_SECS;
    match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(TELEGRAM_HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(request_timeout))
        .build()
    {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!(
                error = %error,
                "failed to build Telegram HTTP client with timeouts; using default client"
            );
            reqwest::Client::new()
        }
    }
}

impl TelegramChannel {
    /// POST one Bot API method and return the `result` payload.
    pub(super) async fn call_api(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TelegramApiError> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|error| TelegramApiError::from_reqwest(&error))?;
        Self::decode_telegram_response(response).await
    }

    pub(super) async fn decode_telegram_response(
        response: reqwest::Response,
    ) -> Result<serde_json::Value, TelegramApiError> {
        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<serde_json::Value>(&body_text).ok();

        if !status.is_success() {
            return Err(TelegramApiError::from_envelope(
                Some(status),
                parsed.as_ref(),
                &body_text,
            ));
        }

        let Some(mut data) = parsed else {
            return Err(TelegramApiError::transport(format!(
                "failed to parse Telegram success response: {body_text}"
            )));
        };

        let ok = data
            .get("ok")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true);
        if !ok {
            return Err(TelegramApiError::from_envelope(
                Some(status),
                Some(&data),
                &body_text,
            ));
        }

        Ok(data
            .get_mut("result")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null))
    }
}
