//! Product identifier parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::regex_util::compile_regex;

/// Length of an Amazon product identifier (ASIN).
pub const PRODUCT_ID_LEN: usize = 10;

/// Amazon's 10-character alphanumeric product code.
///
/// Case is preserved as found in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Accept exactly ten ASCII alphanumeric characters.
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.len() == PRODUCT_ID_LEN && raw.chars().all(|ch| ch.is_ascii_alphanumeric()))
            .then(|| Self(raw.to_string()))
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// First match wins. The catch-all only accepts a whole path segment so that words like
// `/Electronics` never yield `Electronic`.
static PRODUCT_PATH_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)/dp/([A-Z0-9]{10})",
        r"(?i)/gp/product/([A-Z0-9]{10})",
        r"(?i)/product/([A-Z0-9]{10})",
        r"(?i)/d/([A-Z0-9]{10})",
        r"(?i)/([A-Z0-9]{10})(?:/|$)",
    ]
    .into_iter()
    .map(compile_regex)
    .collect()
});

/// Find the product identifier in a URL's path.
///
/// Only the path is inspected when the URL parses, so query strings such as
/// `?tag=...` cannot contribute a match. Unparseable input is scanned as-is.
pub fn extract_product_id(url: &str) -> Option<ProductId> {
    let parsed = reqwest::Url::parse(url).ok();
    let haystack = parsed.as_ref().map_or(url, reqwest::Url::path);
    PRODUCT_PATH_RULES.iter().find_map(|rule| {
        rule.captures(haystack)
            .and_then(|captures| captures.get(1))
            .and_then(|code| ProductId::parse(code.as_str()))
    })
}
