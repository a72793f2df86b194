//! Settings file, environment and CLI resolution.

mod relay;
mod resolve;
mod settings;

pub use relay::{
    DEFAULT_INBOUND_QUEUE_CAPACITY, DEFAULT_PORT, DEFAULT_SOURCE_CHANNEL, ENV_AFFILIATE_TAG,
    ENV_BOT_TOKEN, ENV_DESTINATION_CHANNEL, ENV_LOG_LEVEL, ENV_PORT, ENV_RESOLVE_TIMEOUT_SECS,
    ENV_SOURCE_CHANNEL, ENV_TELEGRAM_API_BASE_URL, LogLevel, RelayConfig, RelayOverrides,
    RequiredSetting, mask_secret, required_settings_status, resolve_log_level,
};
pub use resolve::{EnvSource, ProcessEnv};
pub use settings::{
    AffiliateSettings, ChannelSettings, DEFAULT_SETTINGS_PATH, LoggingSettings, RelayLoopSettings,
    RelaySettings, ServerSettings, TelegramSettings, load_relay_settings, load_settings_file,
};
