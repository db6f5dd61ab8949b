//! Unit tests for the binary's config helpers.

use std::{fs, path::Path};

use serde_json::json;
use tempfile::TempDir;

use crate::{SettleError, config::load_defaults, config_store::PersistenceFormat};

#[test]
fn missing_defaults_flag_gives_empty_mapping() {
    let defaults = load_defaults(None, PersistenceFormat::Json).unwrap();

    assert_eq!(defaults, json!({}));
}

#[test]
fn json_defaults_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.json");
    fs::write(&path, r#"{ "theme": "dark", "window": { "width": 800 } }"#).unwrap();

    let defaults = load_defaults(Some(&path), PersistenceFormat::Json).unwrap();

    assert_eq!(defaults, json!({ "theme": "dark", "window": { "width": 800 } }));
}

#[test]
fn toml_defaults_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.toml");
    fs::write(&path, "theme = \"dark\"\n\n[window]\nwidth = 800\n").unwrap();

    let defaults = load_defaults(Some(&path), PersistenceFormat::Toml).unwrap();

    assert_eq!(defaults, json!({ "theme": "dark", "window": { "width": 800 } }));
}

#[test]
fn non_mapping_defaults_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.json");
    fs::write(&path, "[1, 2]").unwrap();

    assert!(matches!(
        load_defaults(Some(&path), PersistenceFormat::Json),
        Err(SettleError::InvalidDefaults { .. })
    ));
}

#[test]
fn unreadable_defaults_file() {
    let result = load_defaults(
        Some(Path::new("/nonexistent/settle/defaults.json")),
        PersistenceFormat::Json,
    );

    assert!(matches!(result, Err(SettleError::IoError { .. })));
}
