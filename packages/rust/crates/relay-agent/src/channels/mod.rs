//! Chat platform transports.

mod telegram;
mod traits;

pub use telegram::{
    BotIdentity, ChatRef, TELEGRAM_DEFAULT_API_BASE, TELEGRAM_MAX_MESSAGE_LENGTH, TelegramApiError,
    TelegramChannel, markdown_to_telegram_html,
};
pub use traits::{Channel, InboundMessage};
