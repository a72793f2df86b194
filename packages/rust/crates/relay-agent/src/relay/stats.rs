//! Relay counters shared between the handler and the health gateway.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Relay counters, written by the handler and read by the status endpoint.
#[derive(Debug, Default)]
pub struct RelayStats {
    received: AtomicU64,
    forwarded: AtomicU64,
    duplicates: AtomicU64,
    without_links: AtomicU64,
    send_failures: AtomicU64,
    links_replaced: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayStatsSnapshot {
    /// Inbound messages taken off the queue.
    pub received: u64,
    /// Messages posted to the destination channel.
    pub forwarded: u64,
    /// Messages skipped because their ID was already seen.
    pub duplicates: u64,
    /// Messages without text or without Amazon links.
    pub without_links: u64,
    /// Destination sends that failed.
    pub send_failures: u64,
    /// Affiliate substitutions across all forwarded messages.
    pub links_replaced: u64,
}

impl RelayStats {
    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forwarded(&self, links_replaced: usize) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        self.links_replaced
            .fetch_add(links_replaced as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_without_links(&self) {
        self.without_links.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counter values.
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            without_links: self.without_links.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            links_replaced: self.links_replaced.load(Ordering::Relaxed),
        }
    }
}
