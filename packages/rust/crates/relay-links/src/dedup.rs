//! Bounded recent-history set of inbound message identifiers.

use std::collections::{HashSet, VecDeque};

/// Size above which the window is trimmed.
pub const DEDUP_WINDOW_CAPACITY: usize = 1000;
/// Entries kept after a trim (the most recently inserted ones).
pub const DEDUP_WINDOW_RETAIN: usize = 500;

/// Insertion-ordered set of seen message IDs.
///
/// Once more than `capacity` IDs are held, the oldest are evicted until `retain` remain.
/// Owned by a single handler; no interior locking.
#[derive(Debug, Clone)]
pub struct DedupWindow {
    order: VecDeque<i64>,
    members: HashSet<i64>,
    capacity: usize,
    retain: usize,
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupWindow {
    /// Window with the default 1000 → 500 limits.
    pub fn new() -> Self {
        Self::with_limits(DEDUP_WINDOW_CAPACITY, DEDUP_WINDOW_RETAIN)
    }

    /// Window with explicit limits; `retain` is clamped to `1..=capacity`.
    pub fn with_limits(capacity: usize, retain: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity + 1),
            members: HashSet::with_capacity(capacity + 1),
            capacity,
            retain: retain.clamp(1, capacity),
        }
    }

    /// Whether `message_id` was already recorded.
    pub fn contains(&self, message_id: i64) -> bool {
        self.members.contains(&message_id)
    }

    /// Record `message_id`. Returns `false` when it was already present.
    pub fn insert(&mut self, message_id: i64) -> bool {
        if !self.members.insert(message_id) {
            return false;
        }
        self.order.push_back(message_id);
        if self.members.len() > self.capacity {
            let before = self.members.len();
            while self.order.len() > self.retain {
                if let Some(oldest) = self.order.pop_front() {
                    self.members.remove(&oldest);
                }
            }
            tracing::debug!(
                event = "relay.dedup.evicted",
                evicted = before - self.members.len(),
                retained = self.members.len(),
                "dedup window trimmed to most recent entries"
            );
        }
        true
    }

    /// Number of tracked IDs.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no IDs are tracked.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Tracked IDs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }
}
