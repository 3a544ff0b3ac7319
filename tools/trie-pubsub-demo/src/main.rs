// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! trie-pubsub demo CLI
//!
//! Replays reference routing scenarios against a live engine.
//!
//! # Usage
//!
//! ```bash
//! # Multi-branch delivery down a map-driven strategy
//! trie-pubsub-demo run --scenario tree
//!
//! # Root subscription observing every publish
//! trie-pubsub-demo run --scenario splitter
//!
//! # Two subscribers splitting 1000 publishes
//! trie-pubsub-demo run --scenario shards --publishes 1000
//!
//! # Using configuration file
//! trie-pubsub-demo --config pubsub.toml run --scenario shards --deterministic
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trie_pubsub::{
    traverser_fn, FlatPaths, LockMode, PathSegment, PubSub, PubSubConfig, Step,
    SubscribeOptions, Traverser,
};

/// trie-pubsub routing demo
#[derive(Parser, Debug)]
#[command(name = "trie-pubsub-demo")]
#[command(about = "Replay trie-pubsub routing scenarios")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a reference scenario
    Run {
        /// Scenario to replay
        #[arg(short, long, value_enum, default_value = "tree")]
        scenario: Scenario,

        /// Number of publishes (splitter and shards scenarios)
        #[arg(short = 'n', long, default_value = "1000")]
        publishes: usize,

        /// Route shard groups by hash instead of uniformly
        #[arg(long)]
        deterministic: bool,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "pubsub.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Three subscribers along a/b, a/b/c and a/b/d
    Tree,
    /// A root subscriber next to path subscribers
    Splitter,
    /// Two subscribers in one shard group
    Shards,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Commands::Run {
            scenario,
            publishes,
            deterministic,
        } => {
            let config = match args.config {
                Some(ref path) => PubSubConfig::from_file(path)?,
                None => PubSubConfig::default(),
            };
            match scenario {
                Scenario::Tree => run_tree(&config),
                Scenario::Splitter => run_splitter(&config, publishes),
                Scenario::Shards => run_shards(&config, publishes, deterministic),
            }
        }
        Commands::GenConfig { output } => cmd_gen_config(output),
        Commands::Validate { file } => cmd_validate(file),
    }
}

/// Shared log of `(subscriber, data)` deliveries.
type Deliveries = Arc<Mutex<Vec<(String, String)>>>;

fn record(deliveries: &Deliveries, name: &str) -> impl Fn(&String) + Send + Sync + 'static {
    let deliveries = Arc::clone(deliveries);
    let name = name.to_string();
    move |data: &String| {
        deliveries.lock().push((name.clone(), data.clone()));
    }
}

/// Strategy driven by a table keyed on the `-`-joined current path.
fn table_traverser(table: &[(&str, &[&str])]) -> impl Traverser<String> {
    let table: HashMap<String, Vec<PathSegment>> = table
        .iter()
        .map(|(key, next)| {
            (
                key.to_string(),
                next.iter().map(|s| PathSegment::from(*s)).collect(),
            )
        })
        .collect();

    traverser_fn(move |idx: usize, _data: &String, path: &[PathSegment]| {
        let key = path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("-");
        table.get(&key)?.get(idx).cloned().map(Step::new)
    })
}

fn run_tree(config: &PubSubConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pubsub: PubSub<String> = PubSub::from_config(config)?;
    let deliveries = Deliveries::default();

    pubsub.subscribe(record(&deliveries, "sub1"), SubscribeOptions::new().path(["a", "b", "c"]));
    pubsub.subscribe(record(&deliveries, "sub2"), SubscribeOptions::new().path(["a", "b", "d"]));
    pubsub.subscribe(record(&deliveries, "sub3"), SubscribeOptions::new().path(["a", "b"]));

    let traverser = table_traverser(&[
        ("", &["a"][..]),
        ("a", &["b"][..]),
        ("a-b", &["c", "d"][..]),
    ]);
    let delivered = pubsub.publish(&"X".to_string(), &traverser);

    println!("Scenario: tree ({} lock)", lock_label(pubsub.lock_mode()));
    println!("  publish \"X\" -> {} delivery(ies)", delivered);
    for (name, data) in deliveries.lock().iter() {
        println!("  {} <- {}", name, data);
    }
    print_stats(&pubsub);
    Ok(())
}

fn run_splitter(config: &PubSubConfig, publishes: usize) -> Result<(), Box<dyn std::error::Error>> {
    let pubsub: PubSub<String> = PubSub::from_config(config)?;
    let deliveries = Deliveries::default();

    pubsub.subscribe(record(&deliveries, "root"), SubscribeOptions::new());
    pubsub.subscribe(record(&deliveries, "even"), SubscribeOptions::new().path(["even"]));
    pubsub.subscribe(record(&deliveries, "odd"), SubscribeOptions::new().path(["odd"]));

    let parity = FlatPaths::new(["even"]);
    let odd = FlatPaths::new(["odd"]);
    for i in 0..publishes {
        let data = format!("item-{}", i);
        if i % 2 == 0 {
            pubsub.publish(&data, &parity);
        } else {
            pubsub.publish(&data, &odd);
        }
    }

    println!("Scenario: splitter ({} publishes)", publishes);
    print_counts(&deliveries);
    print_stats(&pubsub);
    Ok(())
}

fn run_shards(
    config: &PubSubConfig,
    publishes: usize,
    deterministic: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let builder = PubSub::<String>::builder().config(config.clone());
    let builder = if deterministic {
        builder.deterministic_hash(|data: &String| {
            data.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            })
        })
    } else {
        builder
    };
    let pubsub = builder.build();
    let deliveries = Deliveries::default();

    for name in ["worker-1", "worker-2"] {
        pubsub.subscribe(
            record(&deliveries, name),
            SubscribeOptions::new()
                .path(["a"])
                .shard_id("1")
                .deterministic_routing_name(name),
        );
    }

    let traverser = FlatPaths::new(["a"]);
    for i in 0..publishes {
        pubsub.publish(&format!("job-{}", i), &traverser);
    }

    println!(
        "Scenario: shards ({} publishes, {} routing)",
        publishes,
        if deterministic {
            "deterministic"
        } else {
            "uniform"
        }
    );
    print_counts(&deliveries);
    print_stats(&pubsub);
    Ok(())
}

fn lock_label(mode: LockMode) -> &'static str {
    match mode {
        LockMode::ReadWrite => "read_write",
        LockMode::Reentrant => "reentrant",
    }
}

fn print_counts(deliveries: &Deliveries) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (name, _) in deliveries.lock().iter() {
        *counts.entry(name.clone()).or_default() += 1;
    }
    for (name, count) in &counts {
        println!("  {:<10} {}", name, count);
    }
}

fn print_stats<T: ?Sized>(pubsub: &PubSub<T>) {
    let stats = pubsub.stats();
    println!("--- Engine '{}' ---", pubsub.name());
    println!(
        "  {} publishes, {} deliveries ({:.2} per publish), {} active subscription(s)",
        stats.publishes,
        stats.deliveries,
        stats.fan_out(),
        stats.active_subscriptions()
    );
    tracing::debug!("Final stats: {:?}", stats);
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = PubSubConfig {
        name: "example-pubsub".into(),
        lock_mode: LockMode::ReadWrite,
        seed: Some(42),
    };

    let toml_str = toml::to_string_pretty(&config)?;

    let content = format!(
        r#"# trie-pubsub engine configuration
# Generated by trie-pubsub-demo gen-config
#
# lock_mode: "read_write" (parallel publishes) or "reentrant" (callbacks may
# subscribe/unsubscribe; changes apply when the publish returns)
# seed: optional, makes subscription ids and uniform shard picks replayable

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match PubSubConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("Engine: {}", config.name);
            println!("Lock:   {}", lock_label(config.lock_mode));
            match config.seed {
                Some(seed) => println!("Seed:   {}", seed),
                None => println!("Seed:   (random)"),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}
