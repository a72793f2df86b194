//! Wires the Telegram channel, link pipeline, handler and health server together.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use relay_links::{DedupWindow, LinkResolver, TextRewriter};
use tokio::sync::{mpsc, watch};

use super::handler::RelayHandler;
use super::stats::RelayStats;
use crate::channels::{Channel, TelegramChannel};
use crate::config::RelayConfig;
use crate::gateway::run_http;
use crate::observability::RelayEvent;
use crate::shutdown::shutdown_signal;

/// Run the relay until Ctrl+C / SIGTERM or a fatal channel error.
pub async fn run_relay(config: RelayConfig) -> anyhow::Result<()> {
    run_relay_until(config, shutdown_signal()).await
}

/// Run the relay until `shutdown` resolves or the channel fails fatally.
pub async fn run_relay_until<F>(config: RelayConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let stats = Arc::new(RelayStats::default());
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let gateway_task = tokio::spawn({
        let bind_addr = config.bind_addr.clone();
        let stats = Arc::clone(&stats);
        async move {
            let stopped = async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            };
            run_http(&bind_addr, stats, stopped).await
        }
    });

    let channel = Arc::new(
        TelegramChannel::with_base_url(
            config.bot_token.clone(),
            config.source_channel.clone(),
            config.api_base_url.clone(),
        )
        .with_poll_timeout_secs(config.poll_timeout_secs),
    );

    tokio::pin!(shutdown);
    let result = tokio::select! {
        result = relay_loop(Arc::clone(&channel), &config, Arc::clone(&stats)) => result,
        () = &mut shutdown => {
            tracing::info!(
                event = RelayEvent::ShutdownRequested.as_str(),
                "shutdown signal received; stopping relay"
            );
            Ok(())
        }
    };

    let _ = stop_tx.send(true);
    match gateway_task.await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(error = %error, "health server failed"),
        Err(error) => tracing::error!(error = %error, "health server task panicked"),
    }
    result
}

async fn relay_loop(
    channel: Arc<TelegramChannel>,
    config: &RelayConfig,
    stats: Arc<RelayStats>,
) -> anyhow::Result<()> {
    channel.startup().await.context("telegram startup failed")?;

    let resolver = LinkResolver::http(config.resolve_timeout)
        .context("failed to build short-link resolver")?;
    let rewriter = TextRewriter::new(resolver, config.affiliate_tag.clone());
    let handler = RelayHandler::new(
        Arc::clone(&channel) as Arc<dyn Channel>,
        rewriter,
        config.destination_channel.clone(),
        DedupWindow::new(),
        stats,
    );

    let (tx, rx) = mpsc::channel(config.inbound_queue_capacity);
    let handler_task = tokio::spawn(handler.run(rx));
    let listen_result = channel.listen(tx).await;
    if let Err(error) = handler_task.await {
        tracing::error!(error = %error, "relay handler task panicked");
    }
    listen_result
}
