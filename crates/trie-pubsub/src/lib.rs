// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process publish/subscribe routing over a subscription trie
//!
//! Subscribers register at a path of segments. Publishers hand over a data
//! item plus a traversal strategy that decides, level by level, which child
//! segments the item continues down. One publish can fan out over several
//! branches, and subscribers sharing a shard id split the load among
//! themselves.
//!
//! # Features
//!
//! - **Multi-path fan-out**: strategies yield any number of children per level
//! - **Shard groups**: one delivery per group, uniform or hash-deterministic
//! - **Pruning**: unsubscribe detaches branches that became empty
//! - **Lock modes**: parallel publishes (`ReadWrite`) or callback reentrancy
//!   (`Reentrant`)
//!
//! # Quick Start
//!
//! ```
//! use trie_pubsub::{LinearTraverser, PubSub, SubscribeOptions};
//!
//! let pubsub: PubSub<str> = PubSub::new();
//! let handle = pubsub.subscribe(
//!     |data: &str| println!("eu order: {}", data),
//!     SubscribeOptions::new().path(["orders", "eu"]),
//! );
//!
//! assert_eq!(pubsub.publish("o-1", &LinearTraverser::new(["orders", "eu"])), 1);
//! assert_eq!(pubsub.publish("o-2", &LinearTraverser::new(["orders", "us"])), 0);
//! handle.unsubscribe();
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! name = "orders"
//! lock_mode = "reentrant"   # or "read_write" (default)
//! seed = 42                 # optional, replayable ids and shard picks
//! ```

/// Engine configuration (TOML).
pub mod config;
/// `PubSub` engine, builder, subscribe options and unsubscriber.
pub mod engine;
/// Trie node and subscription envelopes.
pub mod node;
/// Injectable random source.
pub mod random;
/// Path segments.
pub mod segment;
/// Shard selection policy.
pub mod shard;
/// Engine statistics.
pub mod stats;
/// Delivery trait.
pub mod subscriber;
/// Traversal strategies.
pub mod traverser;

pub use config::{ConfigError, LockMode, PubSubConfig};
pub use engine::{PubSub, PubSubBuilder, SubscribeOptions, Unsubscriber};
pub use node::{Envelope, Node, ShardId, SubscriptionId};
pub use random::{FastRandom, RandomSource};
pub use segment::{to_path, Path, PathSegment};
pub use shard::DeterministicHash;
pub use stats::{PubSubStats, PubSubStatsSnapshot};
pub use subscriber::Subscriber;
pub use traverser::{
    traverser_fn, CombinedPaths, Done, FlatPaths, FnTraverser, LinearTraverser,
    PathAndTraversers, PathsWithTraverser, Step, Traverser,
};
