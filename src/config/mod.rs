//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML/JSON)
//!     → loader.rs (parse, layer over defaults)
//!     → env.rs (APP_* overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → store.rs publishes it as the current snapshot
//!
//! On file change:
//!     watcher.rs detects change
//!     → store.rs reloads through loader.rs
//!     → atomic swap of Arc<AppConfig>, or keep the old one on error
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - The store is passed explicitly; there is no process-wide instance

pub mod env;
pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use env::EnvSource;
pub use loader::{load_config, ConfigError, ConfigFormat};
pub use schema::{AppConfig, CacheConfig, DatabaseConfig, LogConfig, ServerConfig, ServerMode};
pub use store::{ConfigStore, Versioned};
pub use watcher::ConfigWatcher;

/// Path used when no `--config` argument is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
