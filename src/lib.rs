//! settle - embeddable configuration store.
//!
//! Holds a nested key/value tree seeded from defaults and gives it:
//!
//! - Dotted-path reads and writes (`"window.bounds.width"`)
//! - Debounced, crash-safe persistence (temp file + rename) in JSON or TOML
//! - Path-scoped watchers notified synchronously on change
//! - Caller-supplied validation rules
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use settle::config_store::{ConfigStore, StoreOptions};
//!
//! let store = ConfigStore::new(
//!     json!({ "theme": "dark", "window": { "width": 800 } }),
//!     StoreOptions::new().persistence_path("/tmp/settle/settings.json"),
//! )?;
//!
//! store.set("window.width", json!(1024))?;
//! store.flush()?;
//! # Ok::<(), settle::config_store::ConfigError>(())
//! ```

/// Filesystem locations and defaults for the command-line tool.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Configuration store with path access, persistence and watchers.
pub mod config_store;

/// Command-line interface for configuration management.
pub mod cli;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{Result, SettleError};
