use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::channels::traits::{Channel, InboundMessage};

use super::TelegramChannel;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn listen(&self, tx: mpsc::Sender<InboundMessage>) -> anyhow::Result<()> {
        self.listen_updates(tx).await
    }

    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        self.send_text(message, recipient).await
    }
}
