//! Configuration loading from files and environment

use layout_queue::config::{ConfigLoader, QueueConfig};
use layout_queue::{Branch, InPlaceQueue, Queue, SetupError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("queue.toml");
    fs::write(
        &path,
        r#"
strict = false
trace_events = true

[logging]
level = "debug"
format = "json"

[logging.modules]
layout_queue = "trace"
"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_file(&path)
        .with_env_prefix("LAYOUT_QUEUE_TEST_FILE")
        .load()
        .unwrap();

    assert!(!config.strict);
    assert!(config.trace_events);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
    assert_eq!(
        config.logging.modules.get("layout_queue").map(String::as_str),
        Some("trace")
    );
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("queue.toml");
    fs::write(&path, "strict = true\n[logging]\nlevel = \"warn\"\n").unwrap();

    std::env::set_var("LAYOUT_QUEUE_TEST_ENV__STRICT", "false");
    std::env::set_var("LAYOUT_QUEUE_TEST_ENV__LOGGING__LEVEL", "error");
    let config = ConfigLoader::new()
        .with_file(&path)
        .with_env_prefix("LAYOUT_QUEUE_TEST_ENV")
        .load();
    std::env::remove_var("LAYOUT_QUEUE_TEST_ENV__STRICT");
    std::env::remove_var("LAYOUT_QUEUE_TEST_ENV__LOGGING__LEVEL");

    let config = config.unwrap();
    assert!(!config.strict);
    assert_eq!(config.logging.level, "error");
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .with_file(temp_dir.path().join("absent.toml"))
        .with_env_prefix("LAYOUT_QUEUE_TEST_MISSING")
        .load();

    assert!(matches!(result, Err(SetupError::Config(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("queue.toml");
    fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();

    let result = ConfigLoader::new()
        .with_file(&path)
        .with_env_prefix("LAYOUT_QUEUE_TEST_INVALID")
        .load();

    assert!(matches!(result, Err(SetupError::Invalid(_))));
}

#[test]
fn test_lenient_queue_from_config() {
    let config = QueueConfig {
        strict: false,
        trace_events: true,
        ..QueueConfig::default()
    };
    let mut queue: InPlaceQueue = Queue::with_config(&config);

    // A lenient queue accepts a second waiter for the same child.
    queue.add_node(Branch::new(1, vec![3])).unwrap();
    queue.add_node(Branch::new(2, vec![3])).unwrap();
    assert_eq!(queue.awaiting(&3), Some(&2));
}
