//! Unit tests for CLI module
//!
//! Tests command registry, formatting, and the config commands against an
//! in-memory store.

use std::{path::Path, sync::Arc};

use serde_json::json;

use crate::{
    cli::{CliError, CliService, CommandRegistry, SetCommand, formatting::format_value},
    config_store::{ConfigStore, ManualScheduler, MemoryProvider, StoreOptions},
};

const STORE_PATH: &str = "/settings.json";

fn service_with(defaults: serde_json::Value) -> (CliService, ConfigStore, Arc<MemoryProvider>) {
    let provider = Arc::new(MemoryProvider::new());
    let store = ConfigStore::new(
        defaults,
        StoreOptions::new()
            .persistence_path(STORE_PATH)
            .provider(provider.clone())
            .scheduler(Arc::new(ManualScheduler::new())),
    )
    .unwrap();

    (CliService::new(store.clone()), store, provider)
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn format_value_scalars() {
    assert_eq!(format_value(&json!("hello world")), "\"hello world\"");
    assert_eq!(format_value(&json!("")), "\"\"");
    assert_eq!(format_value(&json!(42)), "42");
    assert_eq!(format_value(&json!(-2.5)), "-2.5");
    assert_eq!(format_value(&json!(true)), "true");
    assert_eq!(format_value(&json!(null)), "null");
}

#[test]
fn format_value_composites() {
    assert_eq!(format_value(&json!([])), "[]");
    assert_eq!(format_value(&json!({ "a": 1 })), "{\n  \"a\": 1\n}");
}

#[test]
fn parse_config_value_types() {
    assert_eq!(SetCommand::parse_config_value("true"), json!(true));
    assert_eq!(SetCommand::parse_config_value("42"), json!(42));
    assert_eq!(SetCommand::parse_config_value("2.5"), json!(2.5));
    assert_eq!(SetCommand::parse_config_value("+7"), json!(7));
    assert_eq!(SetCommand::parse_config_value("dark"), json!("dark"));
    assert_eq!(SetCommand::parse_config_value("nan"), json!("nan"));
    assert_eq!(
        SetCommand::parse_config_value(r#"{"width": 800}"#),
        json!({ "width": 800 })
    );
    assert_eq!(SetCommand::parse_config_value("[1, 2]"), json!([1, 2]));
}

#[test]
fn registry_starts_empty() {
    let (_, store, _) = service_with(json!({}));
    let registry = CommandRegistry::new(store);

    assert!(registry.list_commands().is_empty());
}

#[test]
fn registry_lists_config_commands() {
    let (service, _, _) = service_with(json!({}));

    assert_eq!(
        service.list_all(),
        vec![(
            "config".to_string(),
            args(&["get", "reset", "set", "show", "validate"])
        )]
    );
}

#[test]
fn unknown_category_and_command() {
    let (service, _, _) = service_with(json!({}));

    assert!(matches!(
        service.execute_command("window", "open", &[]),
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(
        service.execute_command("config", "frobnicate", &[]),
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(
        service.category_help("window"),
        Err(CliError::CommandNotFound(_))
    ));
}

#[test]
fn argument_count_checked() {
    let (service, _, _) = service_with(json!({}));

    assert!(matches!(
        service.execute_command("config", "get", &[]),
        Err(CliError::InvalidArguments(_))
    ));
    assert!(matches!(
        service.execute_command("config", "show", &args(&["extra"])),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn get_and_set() {
    let (service, store, _) = service_with(json!({ "window": { "width": 800 } }));

    let output = service
        .execute_command("config", "get", &args(&["window.width"]))
        .unwrap();
    assert_eq!(output, "window.width: 800");

    let output = service
        .execute_command("config", "set", &args(&["window.width", "1024"]))
        .unwrap();
    assert_eq!(output, "Set window.width = 1024");
    assert_eq!(store.get("window.width"), Some(json!(1024)));
    assert!(store.has_pending_save());
}

#[test]
fn get_missing_path_fails() {
    let (service, _, _) = service_with(json!({}));

    assert!(matches!(
        service.execute_command("config", "get", &args(&["nope"])),
        Err(CliError::ConfigError(_))
    ));
}

#[test]
fn show_prints_tree() {
    let (service, _, _) = service_with(json!({ "theme": "dark" }));

    let output = service.execute_command("config", "show", &[]).unwrap();

    assert_eq!(output, "{\n  \"theme\": \"dark\"\n}");
}

#[test]
fn reset_writes_defaults() {
    let (service, store, provider) = service_with(json!({ "theme": "dark" }));
    store.set("theme", json!("light")).unwrap();

    service.execute_command("config", "reset", &[]).unwrap();

    assert_eq!(store.get("theme"), Some(json!("dark")));
    assert!(
        provider
            .contents(Path::new(STORE_PATH))
            .unwrap()
            .contains("dark")
    );
}

#[test]
fn validate_command() {
    let (service, _, _) = service_with(json!({ "width": 800, "theme": "dark" }));

    assert!(
        service
            .execute_command("config", "validate", &args(&["width", "number"]))
            .is_ok()
    );

    match service.execute_command("config", "validate", &args(&["theme", "number"])) {
        Err(CliError::ValidationFailed(message)) => {
            assert_eq!(message, r#"Validation failed for "theme": must be a number"#);
        }
        other => panic!("Expected ValidationFailed, got {other:?}"),
    }

    assert!(matches!(
        service.execute_command("config", "validate", &args(&["theme", "colour"])),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn help_mentions_every_command() {
    let (service, _, _) = service_with(json!({}));

    let help = service.help();
    let category_help = service.category_help("config").unwrap();

    for command in ["get", "set", "show", "reset", "validate"] {
        assert!(help.contains(command));
        assert!(category_help.contains(command));
    }
    assert!(category_help.contains("required|string|bool|number"));
}
