//! Message-level link substitution.

use std::collections::{HashMap, HashSet};

use crate::affiliate::build_affiliate_link;
use crate::extract::extract_amazon_urls;
use crate::product::ProductId;
use crate::resolve::{LinkResolver, normalize_url};

/// Key shared by every spelling of one link: scheme and `www.` dropped, host lowercased.
///
/// `http://amzn.to/abc`, `https://www.AMZN.to/abc` and the bare `amzn.to/abc` all map to
/// `amzn.to/abc`. The path keeps its case because short-link codes are case-sensitive.
fn resolution_key(raw: &str) -> String {
    let normalized = normalize_url(raw);
    match reqwest::Url::parse(&normalized) {
        Ok(url) => {
            let serialized = url.as_str();
            let rest = serialized
                .split_once("://")
                .map_or(serialized, |(_, rest)| rest);
            rest.strip_prefix("www.").unwrap_or(rest).to_string()
        }
        Err(_) => normalized,
    }
}

/// Outcome of one rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Rewritten message body.
    pub text: String,
    /// `(raw url, affiliate url)` for every substitution performed.
    pub replaced: Vec<(String, String)>,
    /// Raw URLs left untouched because no product identifier was found.
    pub unresolved: Vec<String>,
}

/// Replaces Amazon URLs in a message with affiliate links for one tag.
#[derive(Clone)]
pub struct TextRewriter {
    resolver: LinkResolver,
    affiliate_tag: String,
}

impl TextRewriter {
    /// Rewriter for `affiliate_tag`.
    pub fn new(resolver: LinkResolver, affiliate_tag: impl Into<String>) -> Self {
        Self {
            resolver,
            affiliate_tag: affiliate_tag.into(),
        }
    }

    /// Configured affiliate tag.
    pub fn affiliate_tag(&self) -> &str {
        &self.affiliate_tag
    }

    /// Rewrite every recognized Amazon URL in `text`.
    pub async fn rewrite(&self, text: &str) -> String {
        self.rewrite_with_report(text).await.text
    }

    /// Rewrite and report what changed.
    ///
    /// Substitution is by literal substring, all occurrences at once. Each distinct raw
    /// match is handled once per pass, resolution results are shared between a schemed URL
    /// and its bare tail (whatever the scheme), and a raw match that no longer occurs in the text (because an
    /// earlier substitution consumed it) is skipped without a network call.
    pub async fn rewrite_with_report(&self, text: &str) -> RewriteReport {
        let mut report = RewriteReport {
            text: text.to_string(),
            ..RewriteReport::default()
        };
        let mut handled: HashSet<String> = HashSet::new();
        let mut resolved: HashMap<String, Option<ProductId>> = HashMap::new();

        for raw in extract_amazon_urls(text) {
            let raw = raw.text;
            if !handled.insert(raw.clone()) {
                continue;
            }
            if !report.text.contains(raw.as_str()) {
                tracing::debug!(
                    event = "relay.link.already_replaced",
                    url = %raw,
                    "raw url no longer present after earlier substitution"
                );
                continue;
            }

            let key = resolution_key(&raw);
            let product_id = match resolved.get(&key) {
                Some(cached) => cached.clone(),
                None => {
                    let product_id = self.resolver.resolve(&raw).await;
                    resolved.insert(key, product_id.clone());
                    product_id
                }
            };

            match product_id {
                Some(product_id) => {
                    let affiliate_link = build_affiliate_link(&product_id, &self.affiliate_tag);
                    report.text = report.text.replace(raw.as_str(), &affiliate_link);
                    tracing::info!(
                        event = "relay.link.replaced",
                        url = %raw,
                        affiliate_link = %affiliate_link,
                        "replaced amazon link"
                    );
                    report.replaced.push((raw, affiliate_link));
                }
                None => report.unresolved.push(raw),
            }
        }

        report
    }
}
