// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish traversal.
//!
//! Depth-first walk over an explicit stack of frames. Each frame carries the
//! node, the path that reached it and the strategy to consult there. Children
//! are pushed in reverse so they are visited in the order the strategy yielded
//! them.
//!
//! A node delivers at most once per walk, even when several steps lead to it
//! with different continuations. Every step is still followed.

use crate::node::Node;
use crate::random::RandomSource;
use crate::segment::Path;
use crate::shard::{self, DeterministicHash};
use crate::traverser::Traverser;
use std::collections::HashSet;
use std::sync::Arc;

/// Strategy in effect for a frame: the caller's, or one handed out by a step.
enum Strategy<'a, T: ?Sized> {
    Borrowed(&'a dyn Traverser<T>),
    Owned(Arc<dyn Traverser<T>>),
}

impl<T: ?Sized> Strategy<'_, T> {
    #[inline]
    fn get(&self) -> &dyn Traverser<T> {
        match self {
            Strategy::Borrowed(traverser) => *traverser,
            Strategy::Owned(traverser) => traverser.as_ref(),
        }
    }
}

impl<T: ?Sized> Clone for Strategy<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Strategy::Borrowed(traverser) => Strategy::Borrowed(*traverser),
            Strategy::Owned(traverser) => Strategy::Owned(Arc::clone(traverser)),
        }
    }
}

struct Frame<'a, T: ?Sized> {
    node: &'a Node<T>,
    path: Path,
    strategy: Strategy<'a, T>,
}

/// Read-only view of the engine state a walk needs.
pub(crate) struct Walker<'a, T: ?Sized> {
    pub rng: &'a dyn RandomSource,
    pub hash: Option<&'a DeterministicHash<T>>,
}

impl<T: ?Sized> Walker<'_, T> {
    /// Route `data` from `root`. Returns the number of callbacks invoked.
    pub fn walk(&self, root: &Node<T>, data: &T, traverser: &dyn Traverser<T>) -> usize {
        let mut delivered = 0;
        let mut visited: HashSet<usize> = HashSet::new();
        let mut stack = vec![Frame {
            node: root,
            path: Path::new(),
            strategy: Strategy::Borrowed(traverser),
        }];

        while let Some(frame) = stack.pop() {
            if visited.insert(frame.node as *const Node<T> as usize) {
                delivered += self.deliver(frame.node, data);
            }

            let current = frame.strategy.get();
            let steps: Vec<_> = (0..)
                .map_while(|idx| current.at(idx, data, &frame.path))
                .collect();

            for step in steps.into_iter().rev() {
                // Absent child ends the branch.
                let Some(child) = frame.node.fetch_child(&step.segment) else {
                    continue;
                };
                let strategy = match step.next {
                    Some(next) => Strategy::Owned(next),
                    None => frame.strategy.clone(),
                };
                let mut path = Vec::with_capacity(frame.path.len() + 1);
                path.extend_from_slice(&frame.path);
                path.push(step.segment);
                stack.push(Frame {
                    node: child,
                    path,
                    strategy,
                });
            }
        }

        delivered
    }

    /// Deliver to the subscriptions stored at `node`.
    ///
    /// The broadcast group gets every envelope in subscribe order; any other
    /// shard group gets the one envelope chosen by the shard policy.
    #[inline]
    fn deliver(&self, node: &Node<T>, data: &T) -> usize {
        let mut count = 0;
        node.for_each_subscription(|shard_id, group| {
            if shard_id.is_empty() {
                for envelope in group {
                    envelope.deliver(data);
                    count += 1;
                }
            } else if let Some(envelope) = shard::select(group, data, self.hash, self.rng) {
                envelope.deliver(data);
                count += 1;
            }
        });
        count
    }
}
