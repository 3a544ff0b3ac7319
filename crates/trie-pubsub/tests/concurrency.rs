// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! Multi-threaded smoke tests
//!
//! Publishers and subscribers hammer one engine from several threads; the
//! trie must end up exactly as empty as it started.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use trie_pubsub::{FlatPaths, LinearTraverser, LockMode, PubSub, SubscribeOptions};

const THREADS: usize = 4;
const ROUNDS: usize = 200;

fn churn(mode: LockMode) {
    let pubsub: PubSub<u64> = PubSub::builder().lock_mode(mode).seed(17).build();
    let delivered = Arc::new(AtomicUsize::new(0));

    // Always-present subscriber so every publish has a known minimum.
    let anchor_hits = Arc::new(AtomicUsize::new(0));
    let anchor_clone = Arc::clone(&anchor_hits);
    let anchor = pubsub.subscribe(
        move |_data: &u64| {
            anchor_clone.fetch_add(1, Ordering::Relaxed);
        },
        SubscribeOptions::new().path(["hot"]),
    );

    thread::scope(|scope| {
        for t in 0..THREADS {
            let pubsub = pubsub.clone();
            let delivered = Arc::clone(&delivered);
            scope.spawn(move || {
                let lane = format!("lane-{}", t);
                for round in 0..ROUNDS {
                    let counter = Arc::clone(&delivered);
                    let handle = pubsub.subscribe(
                        move |_data: &u64| {
                            counter.fetch_add(1, Ordering::Relaxed);
                        },
                        SubscribeOptions::new()
                            .path(["hot", lane.as_str(), "leaf"])
                            .shard_id(if round % 2 == 0 { "" } else { "s" }),
                    );
                    pubsub.publish(&(round as u64), &FlatPaths::new(["hot"]));
                    pubsub.publish(
                        &(round as u64),
                        &LinearTraverser::new(["hot", lane.as_str(), "leaf"]),
                    );
                    handle.unsubscribe();
                }
            });
        }
    });

    assert_eq!(anchor_hits.load(Ordering::Relaxed), THREADS * ROUNDS * 2);
    // Each thread's own subscription saw at least its own linear publish.
    assert!(delivered.load(Ordering::Relaxed) >= THREADS * ROUNDS);

    anchor.unsubscribe();
    assert_eq!(pubsub.inspect(|root| root.child_len()), 0);

    let stats = pubsub.stats();
    assert_eq!(stats.publishes, (THREADS * ROUNDS * 2) as u64);
    assert_eq!(stats.active_subscriptions(), 0);
}

#[test]
fn test_concurrent_churn_read_write() {
    churn(LockMode::ReadWrite);
}

#[test]
fn test_concurrent_churn_reentrant() {
    churn(LockMode::Reentrant);
}

#[test]
fn test_engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PubSub<str>>();
    assert_send_sync::<PubSub<[u8]>>();
    assert_send_sync::<trie_pubsub::Unsubscriber<String>>();
}
