//! Cosmetic rewrite of relayed messages.
//!
//! An ordered pipeline of pure stages, each taking the previous stage's output:
//!
//! 1. lead marker: prefix `🔥 ` unless the text already opens with a marker emoji;
//! 2. keyword emoji: whole-word, case-insensitive `keyword` → `emoji keyword`;
//! 3. call to action footer, unless a CTA phrase is present;
//! 4. urgency footer, when a deal keyword is present and no urgency word is;
//! 5. trust footer, when `amazon` appears anywhere;
//! 6. layout: line breaks before numbered-list markers and before every bold span.
//!
//! Stages 2 and 6 never touch the inside of URLs.

use std::sync::LazyLock;

use regex::Regex;

use crate::regex_util::compile_regex;

/// Prefix added to messages that don't open with a marker emoji.
pub const LEAD_MARKER: &str = "🔥 ";
/// Appended when no call-to-action phrase is present.
pub const CALL_TO_ACTION_FOOTER: &str = "\n\n🛒 **Shop Now & Save!**";
/// Appended to deal/price messages without an urgency word.
pub const URGENCY_FOOTER: &str = "\n⚡ **Limited Time Offer!**";
/// Appended whenever the message mentions amazon.
pub const TRUST_FOOTER: &str = "\n✅ **Amazon Verified Product**";

const LEAD_EMOJIS: [char; 8] = ['🎉', '🔥', '⚡', '📱', '💻', '🎧', '📷', '📺'];
const CALL_TO_ACTION_PHRASES: [&str; 6] = [
    "buy now",
    "shop now",
    "get it",
    "grab it",
    "order now",
    "check out",
];
const DEAL_WORDS: [&str; 5] = ["deal", "offer", "sale", "discount", "price"];
const URGENCY_WORDS: [&str; 2] = ["limited", "hurry"];

type Stage = fn(&str) -> String;

const PIPELINE: [Stage; 6] = [
    prefix_lead_marker,
    decorate_keywords,
    append_call_to_action,
    append_urgency,
    append_trust_badge,
    break_layout,
];

static KEYWORD_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\b(deal|offer|sale)\b", "🔥 $1"),
        (r"(?i)\b(amazing|great|best|top)\b", "⭐ $1"),
        (r"(?i)\b(price|cost)\b", "💰 $1"),
        (r"(?i)\b(discount|off|save)\b", "💸 $1"),
        (r"(?i)\b(limited|hurry|quick)\b", "⚡ $1"),
        (r"(?i)\b(quality|premium|exclusive)\b", "✨ $1"),
        (r"(?i)\b(guarantee|warranty)\b", "🛡️ $1"),
        (r"(?i)\b(free|bonus|extra)\b", "🎁 $1"),
        (r"(?i)\b(new|latest|updated)\b", "🆕 $1"),
        (r"(?i)\b(review|rating|star)\b", "⭐ $1"),
        (r"(?i)\b(camera|photo|video)\b", "📸 $1"),
        (r"(?i)\b(audio|sound|music)\b", "🎵 $1"),
        (r"(?i)\b(gaming|game)\b", "🎮 $1"),
        (r"(?i)\b(fitness|health|workout)\b", "💪 $1"),
        (r"(?i)\b(beauty|skincare|makeup)\b", "💄 $1"),
        (r"(?i)\b(kitchen|cooking|food)\b", "🍳 $1"),
        (r"(?i)\b(home|house|living)\b", "🏠 $1"),
        (r"(?i)\b(travel|vacation|trip)\b", "✈️ $1"),
        (r"(?i)\b(tech|technology|smart)\b", "🤖 $1"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (compile_regex(pattern), replacement))
    .collect()
});

static LINK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)https?://\S+|\bamz(?:aff|n)\.(?:in|to)/\S+"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\d+\."));
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\*\*[^*]+\*\*"));

/// Run the full embellishment pipeline. Blank input is returned unchanged.
pub fn embellish(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    let embellished = PIPELINE
        .iter()
        .fold(text.to_string(), |current, stage| stage(&current));
    embellished.trim_end().to_string()
}

fn prefix_lead_marker(text: &str) -> String {
    match text.chars().next() {
        Some(first) if LEAD_EMOJIS.contains(&first) => text.to_string(),
        _ => format!("{LEAD_MARKER}{text}"),
    }
}

fn decorate_keywords(text: &str) -> String {
    map_outside_links(text, |segment| {
        KEYWORD_RULES
            .iter()
            .fold(segment.to_string(), |current, (rule, replacement)| {
                rule.replace_all(&current, *replacement).into_owned()
            })
    })
}

fn append_call_to_action(text: &str) -> String {
    let lower = text.to_lowercase();
    if CALL_TO_ACTION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
    {
        text.to_string()
    } else {
        format!("{text}{CALL_TO_ACTION_FOOTER}")
    }
}

fn append_urgency(text: &str) -> String {
    let lower = text.to_lowercase();
    let mentions_deal = DEAL_WORDS.iter().any(|word| lower.contains(word));
    let already_urgent = URGENCY_WORDS.iter().any(|word| lower.contains(word));
    if mentions_deal && !already_urgent {
        format!("{text}{URGENCY_FOOTER}")
    } else {
        text.to_string()
    }
}

fn append_trust_badge(text: &str) -> String {
    if text.to_lowercase().contains("amazon") {
        format!("{text}{TRUST_FOOTER}")
    } else {
        text.to_string()
    }
}

fn break_layout(text: &str) -> String {
    map_outside_links(text, |segment| {
        let mut breaks: Vec<usize> = LIST_MARKER
            .find_iter(segment)
            .filter(|marker| is_list_marker(segment, marker.start(), marker.end()))
            .map(|marker| marker.start())
            .collect();
        breaks.extend(BOLD_SPAN.find_iter(segment).map(|span| span.start()));
        breaks.sort_unstable();
        breaks.dedup();
        insert_line_breaks(segment, &breaks)
    })
}

/// `N.` preceded by horizontal whitespace and followed by whitespace (or the end).
fn is_list_marker(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let opens_item = matches!(before, Some(ch) if ch.is_whitespace() && ch != '\n');
    let closes_marker = after.is_none_or(char::is_whitespace);
    opens_item && closes_marker
}

fn insert_line_breaks(text: &str, positions: &[usize]) -> String {
    let mut output = String::with_capacity(text.len() + positions.len());
    let mut cursor = 0;
    for &position in positions {
        output.push_str(&text[cursor..position]);
        output.push('\n');
        cursor = position;
    }
    output.push_str(&text[cursor..]);
    output
}

/// Apply `transform` to every span of `text` outside URL tokens.
fn map_outside_links(text: &str, transform: impl Fn(&str) -> String) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for link in LINK_TOKEN.find_iter(text) {
        output.push_str(&transform(&text[cursor..link.start()]));
        output.push_str(link.as_str());
        cursor = link.end();
    }
    output.push_str(&transform(&text[cursor..]));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_marker_requires_surrounding_whitespace() {
        assert_eq!(
            break_layout("Top picks: 1. Mouse 2. Keyboard"),
            "Top picks: \n1. Mouse \n2. Keyboard"
        );
        assert_eq!(break_layout("Now Rs.1299.00 only"), "Now Rs.1299.00 only");
        assert_eq!(break_layout("Rated 4.5 stars"), "Rated 4.5 stars");
    }

    #[test]
    fn every_bold_span_starts_a_new_line() {
        assert_eq!(break_layout("🛒 **Shop**"), "🛒 \n**Shop**");
        assert_eq!(break_layout("Grab this **now**"), "Grab this \n**now**");
        assert_eq!(break_layout("**a** and **b**"), "\n**a** and \n**b**");
    }

    #[test]
    fn links_are_left_intact_by_keyword_stage() {
        let decorated =
            decorate_keywords("deal https://www.amazon.in/dp/B08N5WRWNW?tag=best-deal-21");
        assert_eq!(
            decorated,
            "🔥 deal https://www.amazon.in/dp/B08N5WRWNW?tag=best-deal-21"
        );
    }
}
