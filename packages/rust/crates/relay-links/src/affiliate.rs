use crate::product::ProductId;

/// Storefront prefix of every affiliate link.
pub const AFFILIATE_BASE_URL: &str = "https://www.amazon.in/dp/";

/// `https://www.amazon.in/dp/{id}?tag={tag}`. Neither input is validated here.
pub fn build_affiliate_link(product_id: &ProductId, affiliate_tag: &str) -> String {
    format!("{AFFILIATE_BASE_URL}{product_id}?tag={affiliate_tag}")
}
