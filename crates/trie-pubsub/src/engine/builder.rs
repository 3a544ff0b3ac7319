// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine builder and per-subscription options.
//!
//! The builder fixes everything that cannot change after construction:
//! - Lock mode (read-write or reentrant)
//! - Random source, or a seed for the default one
//! - Optional deterministic hash for shard routing
//! - Name used in log records

use super::PubSub;
use crate::config::{LockMode, PubSubConfig};
use crate::node::ShardId;
use crate::random::{FastRandom, RandomSource};
use crate::segment::{Path, PathSegment};
use crate::shard::DeterministicHash;
use std::sync::Arc;

/// Builder for configuring and creating a [`PubSub`].
pub struct PubSubBuilder<T: ?Sized> {
    pub(super) config: PubSubConfig,
    pub(super) random: Option<Arc<dyn RandomSource>>,
    pub(super) hash: Option<DeterministicHash<T>>,
}

impl<T: ?Sized> PubSubBuilder<T> {
    pub(super) fn new() -> Self {
        Self {
            config: PubSubConfig::default(),
            random: None,
            hash: None,
        }
    }

    /// Start from a loaded configuration. Later setters override it.
    #[must_use]
    pub fn config(mut self, config: PubSubConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the engine name (default: `trie-pubsub`).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the lock mode (default: [`LockMode::ReadWrite`]).
    #[must_use]
    pub fn lock_mode(mut self, mode: LockMode) -> Self {
        self.config.lock_mode = mode;
        self
    }

    /// Seed the default random source. Ignored when a source is injected.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Inject the random source used for ids and uniform shard selection.
    #[must_use]
    pub fn random_source(mut self, source: Arc<dyn RandomSource>) -> Self {
        self.random = Some(source);
        self
    }

    /// Enable deterministic shard routing with `hash`.
    ///
    /// Only groups with at least one named subscription route by hash; the
    /// others stay uniform.
    #[must_use]
    pub fn deterministic_hash<F>(mut self, hash: F) -> Self
    where
        F: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        self.hash = Some(Arc::new(hash));
        self
    }

    /// Build the engine.
    pub fn build(self) -> PubSub<T> {
        let rng: Arc<dyn RandomSource> = match (self.random, self.config.seed) {
            (Some(source), _) => source,
            (None, Some(seed)) => Arc::new(FastRandom::with_seed(seed)),
            (None, None) => Arc::new(FastRandom::new()),
        };
        PubSub::from_parts(self.config.name, self.config.lock_mode, rng, self.hash)
    }
}

/// Where and how a subscription is stored.
///
/// # Example
/// ```
/// use trie_pubsub::SubscribeOptions;
///
/// let options = SubscribeOptions::new()
///     .path(["orders", "eu"])
///     .shard_id("workers")
///     .deterministic_routing_name("worker-1");
/// assert_eq!(options.shard(), "workers");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub(super) path: Path,
    pub(super) shard_id: ShardId,
    pub(super) routing_name: Option<String>,
}

impl SubscribeOptions {
    /// Root subscription, broadcast group, no routing name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe at `path` instead of the root.
    #[must_use]
    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Join shard group `shard_id`. The empty id is the broadcast group.
    #[must_use]
    pub fn shard_id(mut self, shard_id: impl Into<String>) -> Self {
        self.shard_id = shard_id.into();
        self
    }

    /// Name used to order this subscription under deterministic routing.
    /// An empty name means none.
    #[must_use]
    pub fn deterministic_routing_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.routing_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.path
    }

    #[must_use]
    pub fn shard(&self) -> &str {
        &self.shard_id
    }

    #[must_use]
    pub fn routing_name(&self) -> Option<&str> {
        self.routing_name.as_deref()
    }
}
