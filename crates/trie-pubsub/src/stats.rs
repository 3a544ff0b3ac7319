// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters shared by every handle of one engine.
#[derive(Debug)]
pub struct PubSubStats {
    /// Publish calls completed.
    pub publishes: AtomicU64,

    /// Callback invocations across all publishes.
    pub deliveries: AtomicU64,

    /// Subscriptions stored.
    pub subscriptions_added: AtomicU64,

    /// Subscriptions removed by an unsubscriber.
    pub subscriptions_removed: AtomicU64,

    /// Trie nodes detached by pruning (whole subtrees counted per node).
    pub nodes_pruned: AtomicU64,

    /// Engine creation time.
    pub created: Instant,
}

impl PubSubStats {
    pub fn new() -> Self {
        Self {
            publishes: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            subscriptions_added: AtomicU64::new(0),
            subscriptions_removed: AtomicU64::new(0),
            nodes_pruned: AtomicU64::new(0),
            created: Instant::now(),
        }
    }

    pub(crate) fn record_publish(&self, deliveries: usize) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
        self.deliveries
            .fetch_add(deliveries as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_subscribe(&self) {
        self.subscriptions_added.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unsubscribe(&self, pruned: usize) {
        self.subscriptions_removed.fetch_add(1, Ordering::Relaxed);
        self.nodes_pruned.fetch_add(pruned as u64, Ordering::Relaxed);
    }

    /// Get snapshot of current stats.
    pub fn snapshot(&self) -> PubSubStatsSnapshot {
        PubSubStatsSnapshot {
            publishes: self.publishes.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            subscriptions_added: self.subscriptions_added.load(Ordering::Relaxed),
            subscriptions_removed: self.subscriptions_removed.load(Ordering::Relaxed),
            nodes_pruned: self.nodes_pruned.load(Ordering::Relaxed),
            uptime_secs: self.created.elapsed().as_secs(),
        }
    }
}

impl Default for PubSubStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of engine statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubStatsSnapshot {
    pub publishes: u64,
    pub deliveries: u64,
    pub subscriptions_added: u64,
    pub subscriptions_removed: u64,
    pub nodes_pruned: u64,
    pub uptime_secs: u64,
}

impl PubSubStatsSnapshot {
    /// Subscriptions currently stored.
    pub fn active_subscriptions(&self) -> u64 {
        self.subscriptions_added
            .saturating_sub(self.subscriptions_removed)
    }

    /// Calculate publishes per second.
    pub fn publishes_per_second(&self) -> f64 {
        if self.uptime_secs > 0 {
            self.publishes as f64 / self.uptime_secs as f64
        } else {
            0.0
        }
    }

    /// Average deliveries per publish.
    pub fn fan_out(&self) -> f64 {
        if self.publishes > 0 {
            self.deliveries as f64 / self.publishes as f64
        } else {
            0.0
        }
    }
}
