// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shard selection policy.
//!
//! Subscriptions sharing a node and a non-empty shard id split the load: each
//! publish reaching the node goes to exactly one of them. Selection is a pure
//! function of the group and the published data; nothing is remembered
//! between calls.
//!
//! - **Uniform** (default): index drawn from the engine's [`RandomSource`].
//! - **Deterministic**: with a configured hash and at least one named
//!   envelope, candidates are the named envelopes sorted by routing name and
//!   the pick is `hash(data) % candidates`. Unnamed envelopes are then never
//!   chosen.

use crate::node::Envelope;
use crate::random::RandomSource;
use std::sync::Arc;

/// Digest of published data used for deterministic shard routing.
pub type DeterministicHash<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync>;

/// Pick the envelope of `group` that receives `data`.
///
/// Returns `None` only for an empty group.
#[must_use]
pub fn select<'a, T: ?Sized>(
    group: &'a [Envelope<T>],
    data: &T,
    hash: Option<&DeterministicHash<T>>,
    rng: &dyn RandomSource,
) -> Option<&'a Envelope<T>> {
    match group.len() {
        0 => None,
        1 => group.first(),
        len => {
            if let Some(hash) = hash {
                if let Some(envelope) = select_deterministic(group, data, hash) {
                    return Some(envelope);
                }
            }
            group.get(rng.below(len))
        }
    }
}

fn select_deterministic<'a, T: ?Sized>(
    group: &'a [Envelope<T>],
    data: &T,
    hash: &DeterministicHash<T>,
) -> Option<&'a Envelope<T>> {
    let mut candidates: Vec<&Envelope<T>> = group
        .iter()
        .filter(|envelope| envelope.routing_name().is_some())
        .collect();
    if candidates.is_empty() {
        return None;
    }

    // Stable sort: equal names keep subscribe order.
    candidates.sort_by(|a, b| a.routing_name().cmp(&b.routing_name()));
    let idx = (hash(data) % candidates.len() as u64) as usize;
    candidates.get(idx).copied()
}
