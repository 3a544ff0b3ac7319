// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish path benchmarks
//!
//! Measures:
//! - Linear publish down a deep path with one subscriber at the leaf
//! - Fan-out publish over a wide level with broadcast subscribers
//! - Shard group selection (uniform and deterministic)
//! - Subscribe + unsubscribe round trip including pruning

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trie_pubsub::{FlatPaths, LinearTraverser, PubSub, SubscribeOptions};

fn bench_linear_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_linear");
    group.throughput(Throughput::Elements(1));

    for depth in [1usize, 4, 16] {
        let path: Vec<String> = (0..depth).map(|i| format!("level-{}", i)).collect();
        let pubsub: PubSub<u64> = PubSub::builder().seed(1).build();
        pubsub.subscribe(
            |data: &u64| {
                black_box(data);
            },
            SubscribeOptions::new().path(path.iter()),
        );
        let traverser = LinearTraverser::new(path.iter());

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| pubsub.publish(black_box(&42), &traverser));
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fan_out");

    for width in [8usize, 64] {
        let names: Vec<String> = (0..width).map(|i| format!("branch-{}", i)).collect();
        let pubsub: PubSub<u64> = PubSub::builder().seed(2).build();
        for name in &names {
            pubsub.subscribe(
                |data: &u64| {
                    black_box(data);
                },
                SubscribeOptions::new().path([name.as_str()]),
            );
        }
        let traverser = FlatPaths::new(names.iter());

        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| pubsub.publish(black_box(&7), &traverser));
        });
    }
    group.finish();
}

fn bench_shard_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_shard");

    for deterministic in [false, true] {
        let builder = PubSub::<u64>::builder().seed(3);
        let builder = if deterministic {
            builder.deterministic_hash(|data: &u64| *data)
        } else {
            builder
        };
        let pubsub = builder.build();
        for i in 0..16 {
            pubsub.subscribe(
                |data: &u64| {
                    black_box(data);
                },
                SubscribeOptions::new()
                    .shard_id("workers")
                    .deterministic_routing_name(format!("worker-{:02}", i)),
            );
        }
        let traverser = FlatPaths::new(Vec::<&str>::new());
        let label = if deterministic { "deterministic" } else { "uniform" };

        let mut data = 0u64;
        group.bench_function(label, |b| {
            b.iter(|| {
                data = data.wrapping_add(1);
                pubsub.publish(black_box(&data), &traverser)
            });
        });
    }
    group.finish();
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let pubsub: PubSub<u64> = PubSub::builder().seed(4).build();
    pubsub.subscribe(|_data: &u64| {}, SubscribeOptions::new().path(["shared"]));

    c.bench_function("subscribe_unsubscribe_prune", |b| {
        b.iter(|| {
            let handle = pubsub.subscribe(
                |_data: &u64| {},
                SubscribeOptions::new().path(["shared", "a", "b", "c"]),
            );
            handle.unsubscribe();
        });
    });
}

criterion_group!(
    benches,
    bench_linear_depth,
    bench_fan_out,
    bench_shard_selection,
    bench_subscribe_unsubscribe
);
criterion_main!(benches);
