//! Sequential consumer of inbound source posts.

use std::sync::Arc;

use relay_links::{DedupWindow, TextRewriter, embellish, extract_amazon_urls};
use tokio::sync::mpsc;

use super::stats::RelayStats;
use crate::channels::{Channel, InboundMessage};
use crate::observability::RelayEvent;

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Message id already handled; nothing done.
    Duplicate,
    /// No Amazon link in the text; marked seen, not forwarded.
    NoLinks,
    /// Rewritten and delivered.
    Forwarded,
    /// Rewritten but delivery failed; marked seen anyway.
    SendFailed,
}

impl RelayOutcome {
    /// Stable label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::NoLinks => "no_links",
            Self::Forwarded => "forwarded",
            Self::SendFailed => "send_failed",
        }
    }
}

/// Owns the dedup window and turns source posts into affiliate posts.
pub struct RelayHandler {
    channel: Arc<dyn Channel>,
    rewriter: TextRewriter,
    destination: String,
    dedup: DedupWindow,
    stats: Arc<RelayStats>,
}

impl RelayHandler {
    /// Handler sending to `destination` through `channel`.
    pub fn new(
        channel: Arc<dyn Channel>,
        rewriter: TextRewriter,
        destination: impl Into<String>,
        dedup: DedupWindow,
        stats: Arc<RelayStats>,
    ) -> Self {
        Self {
            channel,
            rewriter,
            destination: destination.into(),
            dedup,
            stats,
        }
    }

    /// Shared counters.
    pub fn stats(&self) -> Arc<RelayStats> {
        Arc::clone(&self.stats)
    }

    /// Dedup window state.
    pub fn dedup_window(&self) -> &DedupWindow {
        &self.dedup
    }

    /// Process one message. Never fails: per-message errors are logged and counted.
    pub async fn handle(&mut self, message: InboundMessage) -> RelayOutcome {
        let message_id = message.message_id;
        if self.dedup.contains(message_id) {
            self.stats.record_duplicate();
            tracing::debug!(
                event = RelayEvent::MessageDuplicate.as_str(),
                message_id,
                "message already processed; skipping"
            );
            return RelayOutcome::Duplicate;
        }
        self.stats.record_received();

        let outcome = self.process(message).await;
        self.dedup.insert(message_id);
        outcome
    }

    async fn process(&self, message: InboundMessage) -> RelayOutcome {
        let message_id = message.message_id;
        let text = message.text.unwrap_or_default();
        if extract_amazon_urls(&text).is_empty() {
            self.stats.record_without_links();
            tracing::info!(
                event = RelayEvent::MessageNoLinks.as_str(),
                message_id,
                "no amazon links in message; not forwarding"
            );
            return RelayOutcome::NoLinks;
        }

        let report = self.rewriter.rewrite_with_report(&text).await;
        let outbound = embellish(&report.text);

        match self.channel.send(&outbound, &self.destination).await {
            Ok(()) => {
                self.stats.record_forwarded(report.replaced.len());
                tracing::info!(
                    event = RelayEvent::MessageForwarded.as_str(),
                    message_id,
                    replaced = report.replaced.len(),
                    unresolved = report.unresolved.len(),
                    destination = %self.destination,
                    "forwarded message with affiliate links"
                );
                RelayOutcome::Forwarded
            }
            Err(error) => {
                self.stats.record_send_failure();
                tracing::error!(
                    event = RelayEvent::SendFailed.as_str(),
                    message_id,
                    channel = self.channel.name(),
                    destination = %self.destination,
                    error = %error,
                    "failed to forward message"
                );
                RelayOutcome::SendFailed
            }
        }
    }

    /// Drain `rx` until every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<InboundMessage>) {
        while let Some(message) = rx.recv().await {
            let message_id = message.message_id;
            let outcome = self.handle(message).await;
            tracing::debug!(message_id, outcome = outcome.as_str(), "message handled");
        }
        tracing::debug!("inbound queue closed; relay handler stopping");
    }
}
