use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use relay_agent::RelayOverrides;
use relay_agent::config::DEFAULT_SETTINGS_PATH;

#[derive(Parser)]
#[command(name = "relay-agent")]
#[command(about = "Relay Amazon deals between Telegram channels with your affiliate tag.")]
pub(crate) struct Cli {
    /// Settings file (JSON or YAML).
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    pub(crate) config: PathBuf,

    /// Debug logging for the relay crates (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Listen to the source channel and forward rewritten posts.
    Run(RunArgs),
    /// Show which required settings are present; exits non-zero if any is missing.
    Check(SettingArgs),
}

#[derive(Args, Default)]
pub(crate) struct SettingArgs {
    /// Telegram bot token (env: TELEGRAM_BOT_TOKEN).
    #[arg(long)]
    pub(crate) bot_token: Option<String>,

    /// Destination channel id or @username (env: DESTINATION_CHANNEL_ID).
    #[arg(long)]
    pub(crate) destination: Option<String>,

    /// Affiliate tag appended as `?tag=` (env: AFFILIATE_TAG).
    #[arg(long)]
    pub(crate) affiliate_tag: Option<String>,
}

#[derive(Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) settings: SettingArgs,

    /// Source channel id or @username (env: SOURCE_CHANNEL_ID).
    #[arg(long)]
    pub(crate) source: Option<String>,

    /// Health server listen address (default: 0.0.0.0:$PORT or 0.0.0.0:8080).
    #[arg(long)]
    pub(crate) bind: Option<String>,

    /// Short-link redirect timeout in seconds (env: RELAY_RESOLVE_TIMEOUT_SECS, default 5).
    #[arg(long)]
    pub(crate) resolve_timeout_secs: Option<u64>,

    /// getUpdates long-poll timeout in seconds (default 30).
    #[arg(long)]
    pub(crate) poll_timeout_secs: Option<u64>,

    /// Bot API base URL (env: TELEGRAM_API_BASE_URL).
    #[arg(long)]
    pub(crate) api_base_url: Option<String>,
}

impl SettingArgs {
    pub(crate) fn into_overrides(self) -> RelayOverrides {
        RelayOverrides {
            bot_token: self.bot_token,
            destination_channel: self.destination,
            affiliate_tag: self.affiliate_tag,
            ..RelayOverrides::default()
        }
    }
}

impl RunArgs {
    pub(crate) fn into_overrides(self) -> RelayOverrides {
        RelayOverrides {
            source_channel: self.source,
            bind: self.bind,
            resolve_timeout_secs: self.resolve_timeout_secs,
            poll_timeout_secs: self.poll_timeout_secs,
            api_base_url: self.api_base_url,
            ..self.settings.into_overrides()
        }
    }
}
