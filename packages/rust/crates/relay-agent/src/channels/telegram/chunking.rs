//! Splitting long posts into Telegram-sized parts.

use super::constants::{PART_CONTINUED_PREFIX, PART_CONTINUES_SUFFIX, TELEGRAM_MAX_MESSAGE_LENGTH};

/// Split markdown `message` into parts whose text, continuation markers included, stays
/// within [`TELEGRAM_MAX_MESSAGE_LENGTH`] characters.
///
/// Lengths are counted on the markdown source, a close upper bound for the text Telegram
/// renders from it (HTML tags do not count). A part ends at the last newline in the back half
/// of its window, else after the last space, else mid-word.
pub(super) fn split_for_telegram(message: &str) -> Vec<String> {
    if message.chars().count() <= TELEGRAM_MAX_MESSAGE_LENGTH {
        return vec![message.to_string()];
    }

    let budget = TELEGRAM_MAX_MESSAGE_LENGTH - marker_chars();
    let mut parts: Vec<&str> = Vec::new();
    let mut rest = message;
    while !rest.is_empty() {
        let window_end = byte_offset_after_chars(rest, budget);
        if window_end == rest.len() {
            parts.push(rest);
            break;
        }
        let cut = cut_point(&rest[..window_end], budget);
        parts.push(&rest[..cut]);
        rest = &rest[cut..];
    }

    let total = parts.len();
    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| mark_part(part, index, total))
        .collect()
}

fn marker_chars() -> usize {
    PART_CONTINUED_PREFIX.chars().count() + PART_CONTINUES_SUFFIX.chars().count()
}

fn mark_part(part: &str, index: usize, total: usize) -> String {
    let prefix = if index > 0 { PART_CONTINUED_PREFIX } else { "" };
    let suffix = if index + 1 < total {
        PART_CONTINUES_SUFFIX
    } else {
        ""
    };
    format!("{prefix}{part}{suffix}")
}

fn byte_offset_after_chars(text: &str, count: usize) -> usize {
    text.char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| offset)
}

fn cut_point(window: &str, budget: usize) -> usize {
    let newline = window
        .rfind('\n')
        .filter(|&offset| window[..offset].chars().count() >= budget / 2);
    if let Some(offset) = newline {
        return offset + 1;
    }
    window.rfind(' ').map_or(window.len(), |offset| offset + 1)
}
