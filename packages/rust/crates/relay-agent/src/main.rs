//! relay-agent CLI: `run` the relay or `check` its configuration.
//!
//! Settings come from `config.json` (override with `--config <path>`), environment variables
//! and flags. Logging: `RUST_LOG` wins; otherwise `LOG_LEVEL` or `logging.level`; `--verbose`
//! forces debug.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use relay_agent::{
    LogLevel, ProcessEnv, RelayConfig, load_relay_settings, required_settings_status,
    resolve_log_level, run_relay,
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_relay_settings(&cli.config)?;

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        resolve_log_level(&settings, &ProcessEnv)
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.env_filter_directives()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Command::Run(args) => {
            let config = RelayConfig::resolve(args.into_overrides(), &settings, &ProcessEnv)?;
            tracing::debug!(config = ?config, "relay configuration resolved");
            run_relay(config).await
        }
        Command::Check(args) => {
            let statuses = required_settings_status(&args.into_overrides(), &settings, &ProcessEnv);
            for status in &statuses {
                println!("{status}");
            }
            let missing = statuses
                .iter()
                .filter(|status| status.masked_value.is_none())
                .count();
            if missing > 0 {
                anyhow::bail!("{missing} required setting(s) missing");
            }
            println!("configuration OK");
            Ok(())
        }
    }
}
