//! Link normalization pipeline for the affiliate relay.
//!
//! Text flows through four stages:
//!
//! 1. [`extract_amazon_urls`] finds Amazon URLs (schemed or bare) in free text.
//! 2. [`LinkResolver`] turns each URL into a [`ProductId`], following redirects for short links.
//! 3. [`build_affiliate_link`] formats the canonical affiliate URL.
//! 4. [`TextRewriter`] substitutes every resolved URL in the message body.
//!
//! [`embellish`] applies the cosmetic pass afterwards and [`DedupWindow`] tracks which inbound
//! messages were already handled.

mod affiliate;
mod dedup;
mod embellish;
mod error;
mod extract;
mod product;
mod regex_util;
mod resolve;
mod rewrite;

pub use affiliate::{AFFILIATE_BASE_URL, build_affiliate_link};
pub use dedup::{DEDUP_WINDOW_CAPACITY, DEDUP_WINDOW_RETAIN, DedupWindow};
pub use embellish::{
    CALL_TO_ACTION_FOOTER, LEAD_MARKER, TRUST_FOOTER, URGENCY_FOOTER, embellish,
};
pub use error::ResolveError;
pub use extract::{LinkKind, RawUrl, extract_amazon_urls};
pub use product::{PRODUCT_ID_LEN, ProductId, extract_product_id};
pub use resolve::{
    DEFAULT_RESOLVE_TIMEOUT, HttpRedirectFollower, LinkResolver, RedirectFollower,
    SHORT_LINK_DOMAINS, is_short_link, normalize_url,
};
pub use rewrite::{RewriteReport, TextRewriter};
