//! Amazon URL detection in free text.

use std::sync::LazyLock;

use regex::Regex;

use crate::regex_util::compile_regex;

/// Domain class of a matched URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Product page on a storefront domain (`amazon.in`, `amazon.com`).
    FullPath,
    /// Redirector domain that needs an HTTP round-trip (`amzaff.in`, `amzn.to`, `amzn.in`).
    ShortLink,
}

impl LinkKind {
    /// Stable label for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullPath => "full_path",
            Self::ShortLink => "short_link",
        }
    }
}

/// A URL substring matched in message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUrl {
    /// Exact matched text, used verbatim for substitution.
    pub text: String,
    /// Domain class of the rule that matched.
    pub kind: LinkKind,
}

impl RawUrl {
    /// Matched text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// Rule order is part of the contract: results are concatenated rule by rule.
static AMAZON_URL_RULES: LazyLock<Vec<(LinkKind, Regex)>> = LazyLock::new(|| {
    [
        (LinkKind::FullPath, r"(?i)https?://(?:www\.)?amazon\.in/\S+"),
        (LinkKind::ShortLink, r"(?i)https?://(?:www\.)?amzaff\.in/\S+"),
        (LinkKind::ShortLink, r"(?i)https?://(?:www\.)?amzn\.to/\S+"),
        (LinkKind::ShortLink, r"(?i)https?://(?:www\.)?amzn\.in/\S+"),
        (LinkKind::FullPath, r"(?i)https?://(?:www\.)?amazon\.com/\S+"),
        (LinkKind::ShortLink, r"(?i)\bamzaff\.in/\S+"),
        (LinkKind::ShortLink, r"(?i)\bamzn\.to/\S+"),
        (LinkKind::ShortLink, r"(?i)\bamzn\.in/\S+"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, compile_regex(pattern)))
    .collect()
});

/// Extract every Amazon URL in `text`.
///
/// Matches are grouped by rule (in rule order), then by position. The same substring can
/// appear more than once: `https://amzn.to/x` is matched by the schemed rule and its tail
/// `amzn.to/x` again by the bare rule.
pub fn extract_amazon_urls(text: &str) -> Vec<RawUrl> {
    AMAZON_URL_RULES
        .iter()
        .flat_map(|(kind, rule)| {
            rule.find_iter(text).map(|found| RawUrl {
                text: found.as_str().to_string(),
                kind: *kind,
            })
        })
        .collect()
}
