//! Error types for link resolution.

use thiserror::Error;

/// Why a URL could not be turned into a product identifier.
///
/// Every variant is a per-URL, non-fatal condition: callers log it and leave the URL as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The redirect-following request failed (DNS, TLS, connection reset, ...).
    #[error("redirect request failed for {url}: {reason}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Transport error description.
        reason: String,
    },

    /// The redirect-following request did not finish within the resolver timeout.
    #[error("redirect request timed out for {url} after {timeout_ms}ms")]
    Timeout {
        /// URL that was requested.
        url: String,
        /// Timeout that elapsed.
        timeout_ms: u128,
    },

    /// No product identifier pattern matched the (final) URL.
    #[error("no product identifier found in {url}")]
    NoProductId {
        /// URL that was inspected.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build redirect client: {0}")]
    Client(String),
}
