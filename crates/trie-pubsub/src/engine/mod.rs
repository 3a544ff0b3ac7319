// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish/subscribe engine over the subscription trie.
//!
//! # Architecture
//!
//! ```text
//! subscribe(path) --exclusive--> add_child* -> insert_subscription
//!                                     |
//! publish(data, S) --shared--> root: deliver -> S.at(0..) -> fetch_child
//!                                     v                          |
//!                               shard::select  <-----------------+
//!                                     v
//!                              Subscriber::on_data()
//!                                     |
//! Unsubscriber --exclusive--> delete_subscription -> prune empty chain
//! ```
//!
//! # Lock modes
//!
//! - **ReadWrite**: `parking_lot::RwLock`. Publishes share the lock and run in
//!   parallel; subscribe/unsubscribe take it exclusively. A callback that
//!   subscribes or unsubscribes on the same engine deadlocks.
//! - **Reentrant**: `parking_lot::ReentrantMutex`. All calls are serialized.
//!   Subscribe/unsubscribe issued while a publish walks the trie (typically
//!   from a callback) are staged and applied in call order once the outermost
//!   publish returns.
//!
//! Callbacks run inline on the publishing thread. A panicking callback or
//! strategy unwinds out of `publish`; `parking_lot` locks do not poison, so
//! the engine stays usable.

mod builder;
mod prune;
mod unsubscriber;
mod walk;

pub use builder::{PubSubBuilder, SubscribeOptions};
pub use unsubscriber::Unsubscriber;

use crate::config::{ConfigError, LockMode, PubSubConfig};
use crate::node::{Node, ShardId, SubscriptionId};
use crate::random::RandomSource;
use crate::segment::{display_path, Path};
use crate::shard::DeterministicHash;
use crate::stats::{PubSubStats, PubSubStatsSnapshot};
use crate::subscriber::Subscriber;
use crate::traverser::Traverser;
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use unsubscriber::Registration;
use walk::Walker;

/// In-process publish/subscribe engine routing data through a trie.
///
/// Cloning is cheap and yields another handle to the same engine.
///
/// # Example
/// ```
/// use trie_pubsub::{FlatPaths, PubSub, SubscribeOptions};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let pubsub: PubSub<String> = PubSub::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let hits_clone = Arc::clone(&hits);
///
/// let handle = pubsub.subscribe(
///     move |_data: &String| {
///         hits_clone.fetch_add(1, Ordering::SeqCst);
///     },
///     SubscribeOptions::new().path(["orders"]),
/// );
///
/// pubsub.publish(&"o-1".to_string(), &FlatPaths::new(["orders"]));
/// handle.unsubscribe();
/// pubsub.publish(&"o-2".to_string(), &FlatPaths::new(["orders"]));
///
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
pub struct PubSub<T: ?Sized> {
    inner: Arc<Inner<T>>,
}

pub(crate) struct Inner<T: ?Sized> {
    name: String,
    trie: Trie<T>,
    rng: Arc<dyn RandomSource>,
    hash: Option<DeterministicHash<T>>,
    stats: PubSubStats,
}

enum Trie<T: ?Sized> {
    ReadWrite(RwLock<Root<T>>),
    Reentrant(ReentrantMutex<Staged<T>>),
}

/// Root node plus every subscription id live anywhere in the trie.
struct Root<T: ?Sized> {
    node: Node<T>,
    ids: HashSet<SubscriptionId>,
}

impl<T: ?Sized> Root<T> {
    fn new() -> Self {
        Self {
            node: Node::new(),
            ids: HashSet::new(),
        }
    }
}

/// Reentrant-mode state: the trie plus changes waiting for the walk to end.
struct Staged<T: ?Sized> {
    root: RefCell<Root<T>>,
    pending: RefCell<VecDeque<Mutation<T>>>,
}

/// A change to the trie, applied under exclusive access.
pub(crate) enum Mutation<T: ?Sized> {
    Subscribe {
        path: Path,
        subscriber: Arc<dyn Subscriber<T>>,
        shard_id: ShardId,
        routing_name: Option<String>,
        registration: Arc<Registration>,
    },
    Unsubscribe {
        path: Path,
        registration: Arc<Registration>,
    },
}

impl<T: ?Sized> Inner<T> {
    /// Apply `mutation` now, or stage it if a reentrant walk is in progress.
    pub(crate) fn mutate(&self, mutation: Mutation<T>) {
        match &self.trie {
            Trie::ReadWrite(lock) => {
                let mut root = lock.write();
                self.apply(&mut root, mutation);
            }
            Trie::Reentrant(lock) => {
                let staged = lock.lock();
                staged.pending.borrow_mut().push_back(mutation);
                self.flush(&staged);
            }
        }
    }

    /// Apply staged changes in call order, unless the trie is being walked.
    fn flush(&self, staged: &Staged<T>) {
        let Ok(mut root) = staged.root.try_borrow_mut() else {
            tracing::trace!(
                "Engine '{}' staged {} change(s) until publish returns",
                self.name,
                staged.pending.borrow().len()
            );
            return;
        };
        loop {
            let next = staged.pending.borrow_mut().pop_front();
            let Some(mutation) = next else {
                break;
            };
            self.apply(&mut root, mutation);
        }
    }

    fn apply(&self, root: &mut Root<T>, mutation: Mutation<T>) {
        match mutation {
            Mutation::Subscribe {
                path,
                subscriber,
                shard_id,
                routing_name,
                registration,
            } => {
                // Ids are unique across the whole engine.
                let id = loop {
                    let candidate = self.rng.next_id();
                    if root.ids.insert(candidate) {
                        break candidate;
                    }
                };
                let mut node = &mut root.node;
                for segment in &path {
                    node = node.add_child(segment.clone());
                }
                node.insert_subscription(id, subscriber, shard_id.clone(), routing_name);
                // Set once: each registration belongs to one subscribe call.
                let _ = registration.id.set(id);
                self.stats.record_subscribe();
                tracing::debug!(
                    "Engine '{}' subscribed {} at {} (shard '{}')",
                    self.name,
                    id,
                    display_path(&path),
                    shard_id
                );
            }
            Mutation::Unsubscribe { path, registration } => {
                let Some(&id) = registration.id.get() else {
                    return;
                };
                match prune::remove(&mut root.node, &path, id) {
                    Some(removal) => {
                        root.ids.remove(&id);
                        self.stats.record_unsubscribe(removal.pruned);
                        tracing::debug!(
                            "Engine '{}' unsubscribed {} at {} ({} node(s) pruned)",
                            self.name,
                            id,
                            display_path(&path),
                            removal.pruned
                        );
                    }
                    None => {
                        tracing::debug!(
                            "Engine '{}' has no subscription {} at {}",
                            self.name,
                            id,
                            display_path(&path)
                        );
                    }
                }
            }
        }
    }
}

impl<T: ?Sized> PubSub<T> {
    /// Create an engine with default settings.
    ///
    /// Equivalent to `PubSub::builder().build()`.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new engine builder.
    pub fn builder() -> PubSubBuilder<T> {
        PubSubBuilder::new()
    }

    /// Create an engine from a (validated) configuration.
    pub fn from_config(config: &PubSubConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::builder().config(config.clone()).build())
    }

    pub(crate) fn from_parts(
        name: String,
        lock_mode: LockMode,
        rng: Arc<dyn RandomSource>,
        hash: Option<DeterministicHash<T>>,
    ) -> Self {
        let trie = match lock_mode {
            LockMode::ReadWrite => Trie::ReadWrite(RwLock::new(Root::new())),
            LockMode::Reentrant => Trie::Reentrant(ReentrantMutex::new(Staged {
                root: RefCell::new(Root::new()),
                pending: RefCell::new(VecDeque::new()),
            })),
        };
        tracing::debug!(
            "Engine '{}' created ({:?} lock, {} shard routing)",
            name,
            lock_mode,
            if hash.is_some() {
                "deterministic"
            } else {
                "uniform"
            }
        );

        Self {
            inner: Arc::new(Inner {
                name,
                trie,
                rng,
                hash,
                stats: PubSubStats::new(),
            }),
        }
    }

    /// Register `subscriber` at the options' path.
    ///
    /// Missing nodes along the path are created. The returned handle removes
    /// the subscription; dropping it keeps the subscription alive.
    pub fn subscribe<S>(&self, subscriber: S, options: SubscribeOptions) -> Unsubscriber<T>
    where
        S: Subscriber<T> + 'static,
    {
        self.subscribe_arc(Arc::new(subscriber), options)
    }

    /// Like [`subscribe`](Self::subscribe), for an already shared subscriber.
    pub fn subscribe_arc(
        &self,
        subscriber: Arc<dyn Subscriber<T>>,
        options: SubscribeOptions,
    ) -> Unsubscriber<T> {
        let SubscribeOptions {
            path,
            shard_id,
            routing_name,
        } = options;
        let registration = Arc::new(Registration::default());

        self.inner.mutate(Mutation::Subscribe {
            path: path.clone(),
            subscriber,
            shard_id,
            routing_name,
            registration: Arc::clone(&registration),
        });

        Unsubscriber::new(Arc::downgrade(&self.inner), path, registration)
    }

    /// Route `data` through the trie using `traverser`.
    ///
    /// Delivery happens synchronously on the calling thread, depth-first in
    /// the order the strategy yields children. Each node delivers at most once
    /// per call. Returns the number of callbacks invoked.
    ///
    /// # Panics
    /// Panics from the strategy or from a callback propagate to the caller.
    /// Deliveries already made are not undone.
    pub fn publish(&self, data: &T, traverser: &dyn Traverser<T>) -> usize {
        let inner = &*self.inner;
        let walker = Walker {
            rng: inner.rng.as_ref(),
            hash: inner.hash.as_ref(),
        };

        let delivered = match &inner.trie {
            Trie::ReadWrite(lock) => {
                // Recursive read: a callback may publish again.
                let root = lock.read_recursive();
                walker.walk(&root.node, data, traverser)
            }
            Trie::Reentrant(lock) => {
                let staged = lock.lock();
                let delivered = walker.walk(&staged.root.borrow().node, data, traverser);
                inner.flush(&staged);
                delivered
            }
        };

        inner.stats.record_publish(delivered);
        tracing::trace!(
            "Engine '{}' delivered to {} subscriber(s)",
            inner.name,
            delivered
        );
        delivered
    }

    /// Read-only access to the trie root.
    ///
    /// Holds the engine lock while `f` runs: `f` must not subscribe or
    /// unsubscribe on this engine.
    pub fn inspect<R>(&self, f: impl FnOnce(&Node<T>) -> R) -> R {
        match &self.inner.trie {
            Trie::ReadWrite(lock) => f(&lock.read_recursive().node),
            Trie::Reentrant(lock) => {
                let staged = lock.lock();
                let root = staged.root.borrow();
                f(&root.node)
            }
        }
    }

    /// Get snapshot of current stats.
    pub fn stats(&self) -> PubSubStatsSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn lock_mode(&self) -> LockMode {
        match self.inner.trie {
            Trie::ReadWrite(_) => LockMode::ReadWrite,
            Trie::Reentrant(_) => LockMode::Reentrant,
        }
    }
}

impl<T: ?Sized> Default for PubSub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for PubSub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PubSub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("name", &self.inner.name)
            .field("lock_mode", &self.lock_mode())
            .field("deterministic", &self.inner.hash.is_some())
            .finish_non_exhaustive()
    }
}
