//! Telegram Bot API transport: long polling in, `sendMessage` out.

mod chat;
mod chunking;
mod client;
mod constants;
mod error;
mod listen;
mod markdown;
mod parsing;
mod send;
mod startup;
mod state;
mod trait_impl;

pub use chat::ChatRef;
pub use constants::{TELEGRAM_DEFAULT_API_BASE, TELEGRAM_MAX_MESSAGE_LENGTH};
pub use error::TelegramApiError;
pub use markdown::markdown_to_telegram_html;
pub use startup::BotIdentity;
pub use state::TelegramChannel;
