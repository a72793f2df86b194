//! Resolved runtime configuration for the relay.

use std::fmt;
use std::time::Duration;

use relay_links::DEFAULT_RESOLVE_TIMEOUT;

use super::resolve::{EnvSource, resolve_optional_string, resolve_positive_u64, resolve_string};
use super::settings::RelaySettings;
use crate::channels::ChatRef;

/// Bot API token.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Channel to watch (`@username` or numeric id).
pub const ENV_SOURCE_CHANNEL: &str = "SOURCE_CHANNEL_ID";
/// Channel to post to.
pub const ENV_DESTINATION_CHANNEL: &str = "DESTINATION_CHANNEL_ID";
/// Affiliate `tag` query value.
pub const ENV_AFFILIATE_TAG: &str = "AFFILIATE_TAG";
/// Log verbosity.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Health server port, bound on all interfaces.
pub const ENV_PORT: &str = "PORT";
/// Short-link fetch timeout in seconds.
pub const ENV_RESOLVE_TIMEOUT_SECS: &str = "RELAY_RESOLVE_TIMEOUT_SECS";
/// Bot API base URL, for tests and self-hosted API servers.
pub const ENV_TELEGRAM_API_BASE_URL: &str = "TELEGRAM_API_BASE_URL";

/// Channel watched when none is configured.
pub const DEFAULT_SOURCE_CHANNEL: &str = "@amazonindiaassociates";
/// Health server port when neither `--bind`, `PORT` nor `server.bind` is set.
pub const DEFAULT_PORT: u16 = 8080;
/// Capacity of the listener → handler queue.
pub const DEFAULT_INBOUND_QUEUE_CAPACITY: usize = 100;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const MASK_VISIBLE_CHARS: usize = 10;

/// Verbosity from `LOG_LEVEL` / `logging.level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-link decisions.
    Debug,
    /// Startup and per-message outcomes.
    #[default]
    Info,
    /// Recoverable failures only.
    Warning,
    /// Fatal and send failures only.
    Error,
}

impl LogLevel {
    /// Case-insensitive `DEBUG`, `INFO`, `WARNING`/`WARN`, `ERROR`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// `tracing` level directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }

    /// Filter for the relay crates at this level.
    pub fn env_filter_directives(self) -> String {
        let level = self.as_directive();
        format!("relay_agent={level},relay_links={level}")
    }
}

/// Values given on the command line; `None` defers to env / settings / defaults.
#[derive(Debug, Clone, Default)]
pub struct RelayOverrides {
    /// `--bot-token`.
    pub bot_token: Option<String>,
    /// `--source`.
    pub source_channel: Option<String>,
    /// `--destination`.
    pub destination_channel: Option<String>,
    /// `--affiliate-tag`.
    pub affiliate_tag: Option<String>,
    /// `--bind`, a full `host:port`.
    pub bind: Option<String>,
    /// `--resolve-timeout-secs`.
    pub resolve_timeout_secs: Option<u64>,
    /// `--poll-timeout-secs`.
    pub poll_timeout_secs: Option<u64>,
    /// `--api-base-url`.
    pub api_base_url: Option<String>,
}

/// Fully resolved configuration; required values are guaranteed present.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bot API token; masked in `Debug` output.
    pub bot_token: String,
    /// Chat whose posts are relayed.
    pub source_channel: ChatRef,
    /// Chat the rewritten posts go to, as given.
    pub destination_channel: String,
    /// Affiliate tag appended to every rewritten link.
    pub affiliate_tag: String,
    /// Health server address.
    pub bind_addr: String,
    /// Upper bound for one short-link fetch.
    pub resolve_timeout: Duration,
    /// `getUpdates` long-poll timeout.
    pub poll_timeout_secs: u64,
    /// Listener → handler queue capacity.
    pub inbound_queue_capacity: usize,
    /// Bot API base URL.
    pub api_base_url: String,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &mask_secret(&self.bot_token))
            .field("source_channel", &self.source_channel)
            .field("destination_channel", &self.destination_channel)
            .field("affiliate_tag", &self.affiliate_tag)
            .field("bind_addr", &self.bind_addr)
            .field("resolve_timeout", &self.resolve_timeout)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("inbound_queue_capacity", &self.inbound_queue_capacity)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// One required setting and its (masked) resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSetting {
    /// Environment variable name.
    pub name: &'static str,
    /// Masked value, `None` when unset.
    pub masked_value: Option<String>,
}

impl fmt::Display for RequiredSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.masked_value {
            Some(value) => write!(f, "{}: {value}", self.name),
            None => write!(f, "{}: NOT SET", self.name),
        }
    }
}

/// First ten characters followed by `...`; shorter values are shown whole.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= MASK_VISIBLE_CHARS {
        return value.to_string();
    }
    let visible: String = value.chars().take(MASK_VISIBLE_CHARS).collect();
    format!("{visible}...")
}

struct RequiredValues {
    bot_token: Option<String>,
    destination_channel: Option<String>,
    affiliate_tag: Option<String>,
}

fn required_values(
    overrides: &RelayOverrides,
    settings: &RelaySettings,
    env: &dyn EnvSource,
) -> RequiredValues {
    RequiredValues {
        bot_token: resolve_optional_string(
            overrides.bot_token.clone(),
            env,
            ENV_BOT_TOKEN,
            settings.telegram.bot_token.as_deref(),
        ),
        destination_channel: resolve_optional_string(
            overrides.destination_channel.clone(),
            env,
            ENV_DESTINATION_CHANNEL,
            settings.channels.destination_channel_id.as_deref(),
        ),
        affiliate_tag: resolve_optional_string(
            overrides.affiliate_tag.clone(),
            env,
            ENV_AFFILIATE_TAG,
            settings.affiliate.tag.as_deref(),
        ),
    }
}

/// Status of every required setting, in a fixed order.
pub fn required_settings_status(
    overrides: &RelayOverrides,
    settings: &RelaySettings,
    env: &dyn EnvSource,
) -> Vec<RequiredSetting> {
    let values = required_values(overrides, settings, env);
    [
        (ENV_BOT_TOKEN, values.bot_token),
        (ENV_DESTINATION_CHANNEL, values.destination_channel),
        (ENV_AFFILIATE_TAG, values.affiliate_tag),
    ]
    .into_iter()
    .map(|(name, value)| RequiredSetting {
        name,
        masked_value: value.as_deref().map(mask_secret),
    })
    .collect()
}

/// Log level: `LOG_LEVEL`, then `logging.level`, then info. Unknown names fall back to info.
pub fn resolve_log_level(settings: &RelaySettings, env: &dyn EnvSource) -> LogLevel {
    resolve_optional_string(None, env, ENV_LOG_LEVEL, settings.logging.level.as_deref())
        .and_then(|raw| LogLevel::parse(&raw))
        .unwrap_or_default()
}

impl RelayConfig {
    /// Resolve every value; fails listing all missing required names at once.
    pub fn resolve(
        overrides: RelayOverrides,
        settings: &RelaySettings,
        env: &dyn EnvSource,
    ) -> anyhow::Result<Self> {
        let RequiredValues {
            bot_token,
            destination_channel,
            affiliate_tag,
        } = required_values(&overrides, settings, env);

        let (Some(bot_token), Some(destination_channel), Some(affiliate_tag)) =
            (bot_token, destination_channel, affiliate_tag)
        else {
            let missing: Vec<&str> = required_settings_status(&overrides, settings, env)
                .into_iter()
                .filter(|setting| setting.masked_value.is_none())
                .map(|setting| setting.name)
                .collect();
            anyhow::bail!("missing required settings: {}", missing.join(", "));
        };

        let source_channel = resolve_string(
            overrides.source_channel,
            env,
            ENV_SOURCE_CHANNEL,
            settings.channels.source_channel_id.as_deref(),
            DEFAULT_SOURCE_CHANNEL,
        );
        let bind_addr = resolve_bind_addr(overrides.bind, settings, env);
        let resolve_timeout_secs = resolve_positive_u64(
            overrides.resolve_timeout_secs,
            env,
            ENV_RESOLVE_TIMEOUT_SECS,
            settings.relay.resolve_timeout_secs,
            DEFAULT_RESOLVE_TIMEOUT.as_secs(),
        );
        let poll_timeout_secs = overrides
            .poll_timeout_secs
            .or(settings.relay.poll_timeout_secs)
            .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);
        let inbound_queue_capacity = settings
            .relay
            .inbound_queue_capacity
            .filter(|capacity| *capacity > 0)
            .unwrap_or(DEFAULT_INBOUND_QUEUE_CAPACITY);
        let api_base_url = resolve_string(
            overrides.api_base_url,
            env,
            ENV_TELEGRAM_API_BASE_URL,
            settings.telegram.api_base_url.as_deref(),
            crate::channels::TELEGRAM_DEFAULT_API_BASE,
        );

        Ok(Self {
            bot_token,
            source_channel: ChatRef::parse(&source_channel),
            destination_channel,
            affiliate_tag,
            bind_addr,
            resolve_timeout: Duration::from_secs(resolve_timeout_secs),
            poll_timeout_secs,
            inbound_queue_capacity,
            api_base_url,
        })
    }
}

fn resolve_bind_addr(
    cli_bind: Option<String>,
    settings: &RelaySettings,
    env: &dyn EnvSource,
) -> String {
    if let Some(bind) = cli_bind.filter(|bind| !bind.trim().is_empty()) {
        return bind;
    }
    if let Some(raw) = env.var(ENV_PORT) {
        match raw.trim().parse::<u16>() {
            Ok(port) => return format!("0.0.0.0:{port}"),
            Err(_) => tracing::warn!(value = %raw, "invalid PORT; ignoring"),
        }
    }
    settings
        .server
        .bind
        .clone()
        .filter(|bind| !bind.trim().is_empty())
        .unwrap_or_else(|| format!("0.0.0.0:{DEFAULT_PORT}"))
}
