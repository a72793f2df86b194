//! Per-value precedence: CLI flag > environment > settings file > default.

use std::collections::HashMap;

/// Source of environment variables.
pub trait EnvSource {
    /// Value of `name`, when set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub(crate) fn resolve_optional_string(
    cli_value: Option<String>,
    env: &dyn EnvSource,
    env_name: &str,
    settings_value: Option<&str>,
) -> Option<String> {
    non_blank(cli_value)
        .or_else(|| non_blank(env.var(env_name)))
        .or_else(|| non_blank(settings_value.map(ToString::to_string)))
}

pub(crate) fn resolve_string(
    cli_value: Option<String>,
    env: &dyn EnvSource,
    env_name: &str,
    settings_value: Option<&str>,
    default: &str,
) -> String {
    resolve_optional_string(cli_value, env, env_name, settings_value)
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn resolve_positive_u64(
    cli_value: Option<u64>,
    env: &dyn EnvSource,
    env_name: &str,
    settings_value: Option<u64>,
    default: u64,
) -> u64 {
    if let Some(value) = cli_value
        && value > 0
    {
        return value;
    }
    if let Some(value) = parse_positive_u64(env, env_name) {
        return value;
    }
    if let Some(value) = settings_value
        && value > 0
    {
        return value;
    }
    default
}

fn parse_positive_u64(env: &dyn EnvSource, env_name: &str) -> Option<u64> {
    let raw = env.var(env_name)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!(
                env_var = env_name,
                value = %raw,
                "invalid positive integer in environment; ignoring"
            );
            None
        }
    }
}
