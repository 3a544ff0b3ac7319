// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration file loading tests

use std::io::Write;
use tempfile::NamedTempFile;
use trie_pubsub::{ConfigError, Done, LockMode, PubSub, PubSubConfig, SubscribeOptions};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_engine_from_config_file() {
    let file = write_config(
        r#"
name = "ingest"
lock_mode = "reentrant"
seed = 9
"#,
    );

    let config = PubSubConfig::from_file(file.path()).expect("load config");
    let pubsub: PubSub<str> = PubSub::from_config(&config).expect("build engine");

    assert_eq!(pubsub.name(), "ingest");
    assert_eq!(pubsub.lock_mode(), LockMode::Reentrant);

    pubsub.subscribe(|_data: &str| {}, SubscribeOptions::new());
    assert_eq!(pubsub.publish("x", &Done), 1);
}

#[test]
fn test_same_seed_same_ids() {
    let config = PubSubConfig::from_toml_str("seed = 1234").expect("parse");

    let ids = || {
        let pubsub: PubSub<str> = PubSub::from_config(&config).expect("build engine");
        (0..4)
            .map(|i| {
                pubsub
                    .subscribe(|_data: &str| {}, SubscribeOptions::new().path([format!("p{}", i)]))
                    .id()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(), ids());
}

#[test]
fn test_invalid_files_rejected() {
    let file = write_config("lock_mode = 3");
    assert!(matches!(
        PubSubConfig::from_file(file.path()),
        Err(ConfigError::Toml(_))
    ));

    let file = write_config("name = \"\"");
    let err = PubSubConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("Invalid configuration"));
}
