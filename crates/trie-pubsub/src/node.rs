// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscription trie node.
//!
//! A [`Node`] is one level of the routing trie. It owns its children keyed by
//! [`PathSegment`] and the subscriptions registered at this exact level,
//! grouped by shard id. Nodes never lock anything themselves: the engine holds
//! the trie lock for the whole walk.
//!
//! Shard groups are kept in a `BTreeMap` so iteration order is the shard id
//! order, with the broadcast group (empty id) first. Envelopes inside a group
//! stay in subscribe order.

use crate::random::RandomSource;
use crate::segment::PathSegment;
use crate::subscriber::Subscriber;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Subscription identifier (63-bit, unique within its engine).
pub type SubscriptionId = u64;

/// Shard identifier. The empty string is the broadcast group.
pub type ShardId = String;

/// A registered subscription: callback plus routing metadata.
pub struct Envelope<T: ?Sized> {
    subscriber: Arc<dyn Subscriber<T>>,
    id: SubscriptionId,
    shard_id: ShardId,
    routing_name: Option<String>,
}

impl<T: ?Sized> Envelope<T> {
    #[must_use]
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn shard_id(&self) -> &str {
        &self.shard_id
    }

    /// Deterministic routing name, if one was given at subscribe time.
    #[must_use]
    pub fn routing_name(&self) -> Option<&str> {
        self.routing_name.as_deref()
    }

    /// Hand `data` to the subscriber.
    #[inline]
    pub fn deliver(&self, data: &T) {
        self.subscriber.on_data(data);
    }
}

impl<T: ?Sized> Clone for Envelope<T> {
    fn clone(&self) -> Self {
        Self {
            subscriber: Arc::clone(&self.subscriber),
            id: self.id,
            shard_id: self.shard_id.clone(),
            routing_name: self.routing_name.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Envelope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("id", &self.id)
            .field("shard_id", &self.shard_id)
            .field("routing_name", &self.routing_name)
            .finish_non_exhaustive()
    }
}

/// One level of the subscription trie.
pub struct Node<T: ?Sized> {
    children: HashMap<PathSegment, Node<T>>,
    shards: BTreeMap<ShardId, Vec<Envelope<T>>>,
    shard_index: HashMap<SubscriptionId, ShardId>,
}

impl<T: ?Sized> Node<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: HashMap::new(),
            shards: BTreeMap::new(),
            shard_index: HashMap::new(),
        }
    }

    /// Return the child for `segment`, creating it when missing.
    pub fn add_child(&mut self, segment: PathSegment) -> &mut Node<T> {
        self.children.entry(segment).or_default()
    }

    #[must_use]
    #[inline]
    pub fn fetch_child(&self, segment: &PathSegment) -> Option<&Node<T>> {
        self.children.get(segment)
    }

    pub fn fetch_child_mut(&mut self, segment: &PathSegment) -> Option<&mut Node<T>> {
        self.children.get_mut(segment)
    }

    /// Remove the child (and its whole subtree). Returns `false` if absent.
    pub fn delete_child(&mut self, segment: &PathSegment) -> bool {
        self.children.remove(segment).is_some()
    }

    /// Iterate children in arbitrary order.
    pub fn children(&self) -> impl Iterator<Item = (&PathSegment, &Node<T>)> {
        self.children.iter()
    }

    #[must_use]
    #[inline]
    pub fn child_len(&self) -> usize {
        self.children.len()
    }

    /// Store a new envelope and return its id.
    ///
    /// Ids are drawn from `rng` until one is unused at this node.
    pub fn add_subscription(
        &mut self,
        subscriber: Arc<dyn Subscriber<T>>,
        shard_id: ShardId,
        routing_name: Option<String>,
        rng: &dyn RandomSource,
    ) -> SubscriptionId {
        let id = loop {
            let candidate = rng.next_id();
            if !self.shard_index.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert_subscription(id, subscriber, shard_id, routing_name);
        id
    }

    /// Store a new envelope under an id chosen by the caller.
    ///
    /// The caller guarantees `id` is not already used at this node.
    pub fn insert_subscription(
        &mut self,
        id: SubscriptionId,
        subscriber: Arc<dyn Subscriber<T>>,
        shard_id: ShardId,
        routing_name: Option<String>,
    ) {
        debug_assert!(!self.shard_index.contains_key(&id));
        self.shard_index.insert(id, shard_id.clone());
        self.shards
            .entry(shard_id.clone())
            .or_default()
            .push(Envelope {
                subscriber,
                id,
                shard_id,
                routing_name,
            });
    }

    /// Remove the envelope with `id`. Empty shard groups are dropped.
    ///
    /// Returns `false` if no such subscription lives here.
    pub fn delete_subscription(&mut self, id: SubscriptionId) -> bool {
        let Some(shard_id) = self.shard_index.remove(&id) else {
            return false;
        };

        if let Some(group) = self.shards.get_mut(&shard_id) {
            group.retain(|envelope| envelope.id != id);
            if group.is_empty() {
                self.shards.remove(&shard_id);
            }
        }
        true
    }

    /// Visit every shard group as `(shard_id, envelopes)`.
    #[inline]
    pub fn for_each_subscription<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[Envelope<T>]),
    {
        for (shard_id, group) in &self.shards {
            f(shard_id, group);
        }
    }

    /// Total number of envelopes at this node, across all shard groups.
    #[must_use]
    #[inline]
    pub fn subscription_len(&self) -> usize {
        self.shard_index.len()
    }

    /// Number of shard groups (broadcast group included).
    #[must_use]
    pub fn shard_len(&self) -> usize {
        self.shards.len()
    }

    /// True when neither children nor local subscriptions remain.
    #[must_use]
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.children.is_empty() && self.shard_index.is_empty()
    }
}

impl<T: ?Sized> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("shards", &self.shards)
            .finish()
    }
}
