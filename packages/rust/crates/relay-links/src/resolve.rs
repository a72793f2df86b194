//! URL → product identifier resolution, following redirects for short links.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::product::{ProductId, extract_product_id};

/// Redirector domains whose URLs carry no product identifier of their own.
pub const SHORT_LINK_DOMAINS: [&str; 3] = ["amzaff.in", "amzn.to", "amzn.in"];

/// Upper bound for one redirect-following fetch.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_REDIRECTS: usize = 10;
const RESOLVER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Performs the HTTP round-trip for short links.
#[async_trait]
pub trait RedirectFollower: Send + Sync {
    /// GET `url`, follow redirects, and return the final URL.
    async fn follow(&self, url: &str) -> Result<String, ResolveError>;
}

/// reqwest-backed [`RedirectFollower`].
pub struct HttpRedirectFollower {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpRedirectFollower {
    /// Build a client with a bounded redirect chain and request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .user_agent(RESOLVER_USER_AGENT)
            .build()
            .map_err(|error| ResolveError::Client(error.to_string()))?;
        Ok(Self {
            client,
            timeout: Some(timeout),
        })
    }

    /// Reuse an existing client (its redirect policy decides how far redirects are followed).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }
}

#[async_trait]
impl RedirectFollower for HttpRedirectFollower {
    async fn follow(&self, url: &str) -> Result<String, ResolveError> {
        let response = self.client.get(url).send().await.map_err(|error| {
            if error.is_timeout() {
                ResolveError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.timeout.map_or(0, |timeout| timeout.as_millis()),
                }
            } else {
                ResolveError::Request {
                    url: url.to_string(),
                    reason: error.to_string(),
                }
            }
        })?;
        // Storefronts often answer bots with 503, but the final URL is already known.
        Ok(response.url().to_string())
    }
}

/// Prepend `https://` when `raw` carries no scheme.
pub fn normalize_url(raw: &str) -> String {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Whether the URL's host is a short-link domain (or a subdomain of one).
pub fn is_short_link(url: &str) -> bool {
    let normalized = normalize_url(url);
    let Ok(parsed) = reqwest::Url::parse(&normalized) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    SHORT_LINK_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Turns raw URLs into product identifiers.
#[derive(Clone)]
pub struct LinkResolver {
    follower: Arc<dyn RedirectFollower>,
    timeout: Duration,
}

impl LinkResolver {
    /// Resolver with a custom redirect backend.
    pub fn new(follower: Arc<dyn RedirectFollower>, timeout: Duration) -> Self {
        Self {
            follower,
            timeout: timeout.max(Duration::from_millis(1)),
        }
    }

    /// Resolver backed by [`HttpRedirectFollower`].
    pub fn http(timeout: Duration) -> Result<Self, ResolveError> {
        let follower = HttpRedirectFollower::new(timeout)?;
        Ok(Self::new(Arc::new(follower), timeout))
    }

    /// Timeout applied to each redirect fetch.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `raw` to a product identifier, or explain why not.
    pub async fn try_resolve(&self, raw: &str) -> Result<ProductId, ResolveError> {
        let url = normalize_url(raw);
        let target = if is_short_link(&url) {
            match tokio::time::timeout(self.timeout, self.follower.follow(&url)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ResolveError::Timeout {
                        url,
                        timeout_ms: self.timeout.as_millis(),
                    });
                }
            }
        } else {
            url
        };
        extract_product_id(&target).ok_or(ResolveError::NoProductId { url: target })
    }

    /// Resolve `raw`; failures are logged as warnings and reported as `None`.
    pub async fn resolve(&self, raw: &str) -> Option<ProductId> {
        match self.try_resolve(raw).await {
            Ok(product_id) => Some(product_id),
            Err(error) => {
                tracing::warn!(
                    event = "relay.link.unresolved",
                    url = raw,
                    error = %error,
                    "could not extract product id from url"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_existing_scheme_case_insensitively() {
        assert_eq!(normalize_url("HTTPS://amzn.to/x"), "HTTPS://amzn.to/x");
        assert_eq!(normalize_url("http://amzn.to/x"), "http://amzn.to/x");
        assert_eq!(normalize_url("amzn.to/x"), "https://amzn.to/x");
    }

    #[test]
    fn short_link_match_is_host_based() {
        assert!(is_short_link("amzn.to/abc"));
        assert!(is_short_link("https://www.amzaff.in/abc"));
        assert!(is_short_link("https://AMZN.IN/abc"));
        assert!(!is_short_link("https://www.amazon.in/amzn.to/B08N5WRWNW"));
        assert!(!is_short_link("https://notamzn.to/abc"));
    }
}
