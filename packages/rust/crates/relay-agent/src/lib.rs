//! Telegram affiliate relay.
//!
//! Listens to a source channel, rewrites every Amazon link with the configured affiliate tag,
//! embellishes the text and posts it to a destination channel. A small HTTP server reports
//! liveness and counters.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod relay;
mod shutdown;

pub use channels::{
    BotIdentity, Channel, ChatRef, InboundMessage, TELEGRAM_MAX_MESSAGE_LENGTH, TelegramApiError,
    TelegramChannel, markdown_to_telegram_html,
};
pub use config::{
    EnvSource, LogLevel, ProcessEnv, RelayConfig, RelayOverrides, RelaySettings, RequiredSetting,
    load_relay_settings, required_settings_status, resolve_log_level,
};
pub use gateway::{STATUS_BOT_NAME, StatusResponse, router, run_http};
pub use observability::RelayEvent;
pub use relay::{
    RelayHandler, RelayOutcome, RelayStats, RelayStatsSnapshot, run_relay, run_relay_until,
};
pub use shutdown::shutdown_signal;
