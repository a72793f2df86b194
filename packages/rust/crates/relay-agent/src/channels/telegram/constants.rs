use std::time::Duration;

/// Telegram's maximum message length for text messages.
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Public Bot API endpoint.
pub const TELEGRAM_DEFAULT_API_BASE: &str = "https://api.telegram.org";

pub(super) const PART_CONTINUED_PREFIX: &str = "(continued)\n\n";
pub(super) const PART_CONTINUES_SUFFIX: &str = "\n\n(continues...)";

pub(super) const TELEGRAM_ALLOWED_UPDATES: [&str; 2] = ["channel_post", "message"];
pub(super) const TELEGRAM_DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
pub(super) const TELEGRAM_POLL_RETRY_SECS: u64 = 5;
pub(super) const TELEGRAM_POLL_CONFLICT_RETRY_SECS: u64 = 2;
pub(super) const TELEGRAM_POLL_DEFAULT_RATE_LIMIT_RETRY_SECS: u64 = 1;
pub(super) const TELEGRAM_POLL_MAX_RATE_LIMIT_RETRY_SECS: u64 = 60;
pub(super) const TELEGRAM_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Headroom over the long-poll timeout so `getUpdates` is not cut off client-side.
pub(super) const TELEGRAM_HTTP_REQUEST_TIMEOUT_MARGIN_SECS: u64 = 15;
pub(super) const TELEGRAM_RATE_LIMIT_MARGIN: Duration = Duration::from_secs(10);
