#![allow(missing_docs)]

mod support;

use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use relay_agent::{
    Channel, ChatRef, InboundMessage, TELEGRAM_MAX_MESSAGE_LENGTH, TelegramChannel,
};
use serde_json::json;
use support::{FAKE_TOKEN, ok, rate_limited, spawn_mock_telegram_api};
use tokio::sync::mpsc;

fn channel(api_base: &str, source: &str) -> TelegramChannel {
    TelegramChannel::with_base_url(FAKE_TOKEN, ChatRef::parse(source), api_base)
        .with_poll_timeout_secs(1)
        .with_rate_limit_margin(Duration::ZERO)
}

#[tokio::test]
async fn telegram_startup_retries_once_after_rate_limit() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state.script("getMe", rate_limited(0)).await;
    state
        .script("getMe", ok(json!({"id": 42, "is_bot": true, "username": "relaybot"})))
        .await;
    state
        .script("getChat", ok(json!({"id": -100_123, "title": "Deals", "type": "channel"})))
        .await;

    let channel = channel(&api_base, "@deals");
    let identity = channel.startup().await?;

    assert_eq!(identity.bot_id, 42);
    assert_eq!(identity.bot_username.as_deref(), Some("relaybot"));
    assert_eq!(identity.source_chat_id, -100_123);
    assert_eq!(channel.source_chat_id(), Some(-100_123));
    assert_eq!(state.requests_for("getMe").await.len(), 2);
    let chat_requests = state.requests_for("getChat").await;
    assert_eq!(chat_requests[0]["chat_id"], "@deals");

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_startup_fails_on_second_rate_limit() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state.script("getMe", rate_limited(0)).await;
    state.script("getMe", rate_limited(0)).await;

    let error = channel(&api_base, "@deals")
        .startup()
        .await
        .err()
        .context("second flood wait should be fatal")?;

    assert!(error.to_string().contains("getMe"), "unexpected error: {error}");
    assert_eq!(state.requests_for("getMe").await.len(), 2);
    assert!(state.requests_for("getChat").await.is_empty());

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_uses_html_and_falls_back_to_plain() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state
        .script(
            "sendMessage",
            (
                StatusCode::BAD_REQUEST,
                json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: can't parse entities: unsupported start tag"
                }),
            ),
        )
        .await;

    channel(&api_base, "@deals")
        .send("🔥 **Deal** <x>", "-1009876543210")
        .await?;

    let sends = state.requests_for("sendMessage").await;
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0]["parse_mode"], "HTML");
    assert_eq!(sends[0]["text"], "🔥 <b>Deal</b> &lt;x&gt;");
    assert_eq!(sends[0]["chat_id"], -1_009_876_543_210_i64);
    assert!(sends[1].get("parse_mode").is_none());
    assert_eq!(sends[1]["text"], "🔥 **Deal** <x>");

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_retries_once_after_rate_limit() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state.script("sendMessage", rate_limited(0)).await;

    channel(&api_base, "@deals").send("hello", "@mydeals").await?;

    let sends = state.requests_for("sendMessage").await;
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[1]["chat_id"], "@mydeals");
    assert_eq!(sends[1]["parse_mode"], "HTML");

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_keeps_html_when_only_markup_exceeds_limit() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    // 3000 source chars render to more than 4096 HTML chars, but the visible text still fits.
    let message = "**ab** ".repeat(428);
    assert!(message.chars().count() <= TELEGRAM_MAX_MESSAGE_LENGTH);

    channel(&api_base, "@deals").send(&message, "@mydeals").await?;

    let sends = state.requests_for("sendMessage").await;
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0]["parse_mode"], "HTML");
    let text = sends[0]["text"].as_str().context("text")?;
    assert!(text.chars().count() > TELEGRAM_MAX_MESSAGE_LENGTH);
    assert!(text.starts_with("<b>ab</b>"));

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_splits_long_message_into_ordered_parts() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    let message = format!("🔥 **Deal** {}", "word ".repeat(1200));

    channel(&api_base, "@deals").send(&message, "@mydeals").await?;

    let sends = state.requests_for("sendMessage").await;
    assert_eq!(sends.len(), 2);
    let first = sends[0]["text"].as_str().context("first part")?;
    let second = sends[1]["text"].as_str().context("second part")?;
    assert!(first.starts_with("🔥 <b>Deal</b>"));
    assert!(first.ends_with("(continues...)"));
    assert!(second.starts_with("(continued)"));
    for send in &sends {
        assert_eq!(send["parse_mode"], "HTML");
        assert_eq!(send["chat_id"], "@mydeals");
        let text = send["text"].as_str().context("part text")?;
        assert!(text.chars().count() <= TELEGRAM_MAX_MESSAGE_LENGTH);
    }

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_failure_is_not_retried() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state
        .script(
            "sendMessage",
            (
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
            ),
        )
        .await;

    let result = channel(&api_base, "@deals").send("hello", "@missing").await;

    assert!(result.is_err());
    assert_eq!(state.requests_for("sendMessage").await.len(), 1);

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_listen_delivers_only_source_posts() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api().await? else {
        return Ok(());
    };
    state
        .script(
            "getUpdates",
            ok(json!([
                {
                    "update_id": 100,
                    "channel_post": {
                        "message_id": 10,
                        "chat": {"id": -100_123, "type": "channel", "username": "Deals"},
                        "text": "Great deal! https://amzn.to/abc123"
                    }
                },
                {
                    "update_id": 101,
                    "message": {
                        "message_id": 11,
                        "chat": {"id": -100_999, "type": "supergroup", "username": "other"},
                        "text": "https://amzn.to/ignored"
                    }
                },
                {
                    "update_id": 102,
                    "channel_post": {
                        "message_id": 12,
                        "chat": {"id": -100_123, "type": "channel", "username": "deals"},
                        "caption": "photo deal amzn.to/xyz"
                    }
                },
                {
                    "update_id": 103,
                    "channel_post": {
                        "message_id": 13,
                        "chat": {"id": -100_123, "type": "channel", "username": "deals"}
                    }
                }
            ])),
        )
        .await;

    let channel = channel(&api_base, "@deals");
    let (tx, mut rx) = mpsc::channel(8);
    let result = channel.listen(tx).await;
    assert!(result.is_err(), "401 on the second poll should stop listening");

    let mut received: Vec<InboundMessage> = Vec::new();
    while let Some(message) = rx.recv().await {
        received.push(message);
    }
    assert_eq!(
        received,
        vec![
            InboundMessage {
                message_id: 10,
                chat_id: -100_123,
                text: Some("Great deal! https://amzn.to/abc123".to_string()),
            },
            InboundMessage {
                message_id: 12,
                chat_id: -100_123,
                text: Some("photo deal amzn.to/xyz".to_string()),
            },
            InboundMessage {
                message_id: 13,
                chat_id: -100_123,
                text: None,
            },
        ]
    );

    let polls = state.requests_for("getUpdates").await;
    assert_eq!(polls.len(), 2);
    assert_eq!(polls[0]["allowed_updates"], json!(["channel_post", "message"]));
    assert_eq!(polls[1]["offset"], 104);

    handle.abort();
    Ok(())
}
