//! Structured event names shared by relay log lines.

/// Every structured `event` field emitted by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayEvent {
    /// Bot identity and source chat confirmed.
    StartupReady,
    /// Waiting out a Bot API flood limit before retrying.
    RateLimitWait,
    /// Polling started.
    ListenStarted,
    /// Update received from the source chat.
    MessageReceived,
    /// Message id already handled.
    MessageDuplicate,
    /// Message carries no Amazon link.
    MessageNoLinks,
    /// Rewritten message delivered to the destination.
    MessageForwarded,
    /// Delivery to the destination failed.
    SendFailed,
    /// HTML send rejected; plain text retried.
    SendPlainFallback,
    /// Health server listening.
    GatewayListening,
    /// Shutdown signal observed.
    ShutdownRequested,
}

impl RelayEvent {
    /// Dotted event name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartupReady => "relay.startup.ready",
            Self::RateLimitWait => "relay.telegram.rate_limit_wait",
            Self::ListenStarted => "relay.telegram.listen_started",
            Self::MessageReceived => "relay.message.received",
            Self::MessageDuplicate => "relay.message.duplicate",
            Self::MessageNoLinks => "relay.message.no_links",
            Self::MessageForwarded => "relay.message.forwarded",
            Self::SendFailed => "relay.message.send_failed",
            Self::SendPlainFallback => "relay.telegram.send_plain_fallback",
            Self::GatewayListening => "relay.gateway.listening",
            Self::ShutdownRequested => "relay.shutdown.requested",
        }
    }
}

impl std::fmt::Display for RelayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
