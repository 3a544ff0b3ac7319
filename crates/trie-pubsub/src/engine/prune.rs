// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscription removal and empty-branch pruning.
//!
//! ```text
//! depth:   0 (root)   1     2     3
//! path:         a     b     c
//! record:  (1,0)    (2,0) (1,0) (0,0)     (children, subscriptions)
//!                          ^-----------^  removable chain
//! ```
//!
//! After the envelope is gone, the path is walked once more read-only to
//! record each level's occupancy. The deepest run of levels that hold nothing
//! but the next level of the run is detached with one `delete_child` on its
//! parent. The root is never detached.

use crate::node::{Node, SubscriptionId};
use crate::segment::PathSegment;

/// Outcome of a successful removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Removal {
    /// Nodes detached from the trie.
    pub pruned: usize,
}

/// Remove subscription `id` stored at `path`, then prune empty ancestors.
///
/// Returns `None` when the path or the subscription no longer exists.
pub(crate) fn remove<T: ?Sized>(
    root: &mut Node<T>,
    path: &[PathSegment],
    id: SubscriptionId,
) -> Option<Removal> {
    let mut node = &mut *root;
    for segment in path {
        node = node.fetch_child_mut(segment)?;
    }
    if !node.delete_subscription(id) {
        return None;
    }

    let occupancy = record(root, path)?;
    let Some(top) = removable_from(&occupancy) else {
        return Some(Removal { pruned: 0 });
    };

    let mut parent = &mut *root;
    for segment in &path[..top - 1] {
        parent = parent.fetch_child_mut(segment)?;
    }
    parent.delete_child(&path[top - 1]);

    Some(Removal {
        pruned: path.len() + 1 - top,
    })
}

/// `(child_len, subscription_len)` for every level from the root to the end
/// of `path`.
fn record<T: ?Sized>(root: &Node<T>, path: &[PathSegment]) -> Option<Vec<(usize, usize)>> {
    let mut occupancy = Vec::with_capacity(path.len() + 1);
    let mut node = root;
    occupancy.push((node.child_len(), node.subscription_len()));
    for segment in path {
        node = node.fetch_child(segment)?;
        occupancy.push((node.child_len(), node.subscription_len()));
    }
    Some(occupancy)
}

/// Shallowest depth (never 0) starting a chain of removable levels that runs
/// to the end of the path.
fn removable_from(occupancy: &[(usize, usize)]) -> Option<usize> {
    let leaf = occupancy.len().checked_sub(1)?;
    let mut top = None;
    for depth in (1..=leaf).rev() {
        let (children, subscriptions) = occupancy[depth];
        // Inner levels of the chain keep exactly the next removable level.
        let chain_children = usize::from(depth != leaf);
        if subscriptions != 0 || children != chain_children {
            break;
        }
        top = Some(depth);
    }
    top
}
