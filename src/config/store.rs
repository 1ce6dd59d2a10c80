//! Hot-swappable configuration store.
//!
//! The store owns one published [`AppConfig`] snapshot behind an [`ArcSwap`].
//! Readers take a single atomic load and never block; a reload builds the new
//! snapshot off to the side and publishes it with one pointer swap, so a
//! reader sees either the old or the new configuration in full.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::config::env::EnvSource;
use crate::config::loader::{load_config_with_env, ConfigError};
use crate::config::schema::{AppConfig, CacheConfig, DatabaseConfig, LogConfig, ServerConfig};

/// A published snapshot and the generation it was published under.
///
/// Both travel in one `Arc` so a reader never pairs a new config with an old
/// generation number.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub generation: u64,
    pub config: Arc<AppConfig>,
}

/// Shared handle to the live configuration.
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<Versioned>,
    path: Option<PathBuf>,
    env: EnvSource,
    /// Serializes reloads so two parse-and-swap sequences cannot interleave.
    reload_lock: Mutex<()>,
}

impl Versioned {
    fn first(config: AppConfig) -> Self {
        Self {
            generation: 1,
            config: Arc::new(config),
        }
    }
}

impl ConfigStore {
    /// Load `path` with `APP_*` overrides from the process environment.
    pub fn initialize(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::initialize_with_env(path, EnvSource::Process)
    }

    /// Load `path` with an explicit override source.
    pub fn initialize_with_env(path: impl AsRef<Path>, env: EnvSource) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config = load_config_with_env(&path, &env)?;

        tracing::debug!(path = %path.display(), "Initial configuration loaded");
        Ok(Self {
            current: ArcSwap::from_pointee(Versioned::first(config)),
            path: Some(path),
            env,
            reload_lock: Mutex::new(()),
        })
    }

    /// Wrap an in-memory configuration. Such a store has no file to reload from.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(Versioned::first(config)),
            path: None,
            env: EnvSource::Empty,
            reload_lock: Mutex::new(()),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<AppConfig> {
        self.current.load().config.clone()
    }

    /// The current snapshot together with its generation, from a single load.
    pub fn versioned(&self) -> Arc<Versioned> {
        self.current.load_full()
    }

    /// Re-read the backing file and publish the result.
    ///
    /// On failure the previous snapshot stays authoritative and the error is
    /// returned after being logged.
    pub fn reload(&self) -> Result<Arc<AppConfig>, ConfigError> {
        let Some(path) = self.path.as_deref() else {
            tracing::debug!("Reload requested for in-memory configuration, nothing to do");
            return Ok(self.snapshot());
        };

        let _guard = self.reload_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match load_config_with_env(path, &self.env) {
            Ok(config) => {
                let (generation, config) = self.swap_locked(config);
                tracing::info!(
                    generation,
                    server = %config.server.name,
                    bind = %config.server.bind_address(),
                    mode = config.server.server_mode().as_str(),
                    database = %format!("{}:{}/{}", config.database.host, config.database.port, config.database.database),
                    "Configuration reloaded"
                );
                Ok(config)
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to reload config. Keeping current configuration."
                );
                Err(e)
            }
        }
    }

    /// Replace the snapshot with an already-built configuration.
    pub fn publish(&self, config: AppConfig) -> Arc<AppConfig> {
        let _guard = self.reload_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.swap_locked(config).1
    }

    /// Caller holds `reload_lock`.
    fn swap_locked(&self, config: AppConfig) -> (u64, Arc<AppConfig>) {
        let generation = self.current.load().generation + 1;
        let config = Arc::new(config);
        self.current.store(Arc::new(Versioned {
            generation,
            config: config.clone(),
        }));
        (generation, config)
    }

    /// Number of snapshots published so far, starting at 1.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Backing file, if the store was loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn server(&self) -> ServerConfig {
        self.current.load().config.server.clone()
    }

    pub fn database(&self) -> DatabaseConfig {
        self.current.load().config.database.clone()
    }

    pub fn cache(&self) -> CacheConfig {
        self.current.load().config.cache.clone()
    }

    pub fn log(&self) -> LogConfig {
        self.current.load().config.log.clone()
    }

    /// Look up a dotted key such as `server.name`. Numbers and booleans are rendered as text.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Look up a dotted key as an integer. Numeric strings are parsed.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.lookup(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Look up a dotted key as a boolean. `"true"`/`"false"` strings are parsed.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.lookup(key)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        let tree = serde_json::to_value(&*self.snapshot()).ok()?;
        let mut parts = key.split('.');
        let section = match parts.next()?.to_ascii_lowercase().as_str() {
            "redis" => "cache".to_string(),
            other => other.to_string(),
        };
        let mut node = tree.get(section.as_str())?;
        for part in parts {
            node = node.get(part.to_ascii_lowercase().as_str())?;
        }
        Some(node.clone())
    }
}
