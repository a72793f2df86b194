//! Channel trait and inbound message type.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// A new message observed in the source chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message id within the source chat; the dedup key.
    pub message_id: i64,
    /// Chat the message was posted in.
    pub chat_id: i64,
    /// Body text (or media caption). `None` for updates without either.
    pub text: Option<String>,
}

/// Messaging platform the relay listens on and forwards to.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver source messages into `tx` until the platform fails fatally or `tx` closes.
    async fn listen(&self, tx: mpsc::Sender<InboundMessage>) -> anyhow::Result<()>;

    /// Send `message` (markdown with `**bold**`) to `recipient`.
    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()>;
}
