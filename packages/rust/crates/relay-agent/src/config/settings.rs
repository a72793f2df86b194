//! Settings file loader.
//!
//! The file (default `config.json`) is parsed with `serde_yaml`, so both JSON and YAML work.
//! A missing file yields empty settings; a malformed one is an error.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "config.json";

/// Everything the settings file may carry. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelaySettings {
    /// `telegram:` section.
    pub telegram: TelegramSettings,
    /// `channels:` section.
    pub channels: ChannelSettings,
    /// `affiliate:` section.
    pub affiliate: AffiliateSettings,
    /// `logging:` section.
    pub logging: LoggingSettings,
    /// `relay:` section.
    pub relay: RelayLoopSettings,
    /// `server:` section.
    pub server: ServerSettings,
}

/// Bot API access.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelegramSettings {
    /// Bot API token.
    pub bot_token: Option<String>,
    /// Bot API base URL.
    pub api_base_url: Option<String>,
}

/// Source and destination chats.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelSettings {
    /// Chat to watch.
    pub source_channel_id: Option<String>,
    /// Chat to post to.
    pub destination_channel_id: Option<String>,
}

/// Affiliate program values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AffiliateSettings {
    /// Affiliate `tag` query value.
    pub tag: Option<String>,
}

/// Log output.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `DEBUG`, `INFO`, `WARNING` or `ERROR`.
    pub level: Option<String>,
}

/// Relay loop tuning.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelayLoopSettings {
    /// Short-link fetch timeout.
    pub resolve_timeout_secs: Option<u64>,
    /// `getUpdates` long-poll timeout.
    pub poll_timeout_secs: Option<u64>,
    /// Listener → handler queue capacity.
    pub inbound_queue_capacity: Option<usize>,
}

/// Health server.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    /// Health server `host:port`.
    pub bind: Option<String>,
}

impl RelaySettings {
    /// Values from `overlay` win; unset overlay fields keep `self`.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            telegram: TelegramSettings {
                bot_token: overlay.telegram.bot_token.or(self.telegram.bot_token),
                api_base_url: overlay.telegram.api_base_url.or(self.telegram.api_base_url),
            },
            channels: ChannelSettings {
                source_channel_id: overlay
                    .channels
                    .source_channel_id
                    .or(self.channels.source_channel_id),
                destination_channel_id: overlay
                    .channels
                    .destination_channel_id
                    .or(self.channels.destination_channel_id),
            },
            affiliate: AffiliateSettings {
                tag: overlay.affiliate.tag.or(self.affiliate.tag),
            },
            logging: LoggingSettings {
                level: overlay.logging.level.or(self.logging.level),
            },
            relay: RelayLoopSettings {
                resolve_timeout_secs: overlay
                    .relay
                    .resolve_timeout_secs
                    .or(self.relay.resolve_timeout_secs),
                poll_timeout_secs: overlay
                    .relay
                    .poll_timeout_secs
                    .or(self.relay.poll_timeout_secs),
                inbound_queue_capacity: overlay
                    .relay
                    .inbound_queue_capacity
                    .or(self.relay.inbound_queue_capacity),
            },
            server: ServerSettings {
                bind: overlay.server.bind.or(self.server.bind),
            },
        }
    }
}

/// Load settings from `path`. A missing file yields defaults.
pub fn load_settings_file(path: &Path) -> anyhow::Result<RelaySettings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "settings file not found; using defaults");
        return Ok(RelaySettings::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(RelaySettings::default());
    }
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

/// Load the settings file, then overlay `<stem>.local.<ext>` beside it when present.
pub fn load_relay_settings(path: &Path) -> anyhow::Result<RelaySettings> {
    let base = load_settings_file(path)?;
    let local = load_settings_file(&local_override_path(path))?;
    Ok(base.merge(local))
}

fn local_override_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "config".into(), |stem| stem.to_string_lossy());
    let file_name = match path.extension() {
        Some(extension) => format!("{stem}.local.{}", extension.to_string_lossy()),
        None => format!("{stem}.local"),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_override_sits_beside_base_file() {
        assert_eq!(
            local_override_path(Path::new("/etc/relay/config.json")),
            PathBuf::from("/etc/relay/config.local.json")
        );
        assert_eq!(
            local_override_path(Path::new("settings")),
            PathBuf::from("settings.local")
        );
    }
}
