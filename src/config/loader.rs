//! Configuration loading from disk.
//!
//! Values are layered as `defaults ← file ← APP_* environment` on a
//! `serde_json::Value` tree, then deserialized into [`AppConfig`] and
//! validated.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::config::env::{apply_env_overrides, EnvSource};
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("invalid value for {key}: {value:?}")]
    Env { key: String, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn parse(&self, content: &str) -> Result<Value, ConfigError> {
        if content.trim().is_empty() {
            return Err(self.parse_error("document is empty"));
        }
        let parsed = match self {
            ConfigFormat::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| self.parse_error(message))
    }

    fn parse_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Parse {
            format: self.name(),
            message: message.into(),
        }
    }
}

/// Load and validate configuration, applying overrides from the process environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load_config_with_env(path, &EnvSource::Process)
}

/// Load and validate configuration with an explicit override source.
pub fn load_config_with_env(path: &Path, env: &EnvSource) -> Result<AppConfig, ConfigError> {
    let format =
        ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content, format, env.vars())
}

/// Parse an in-memory document through the same layering as [`load_config`].
pub fn parse_config<I>(content: &str, format: ConfigFormat, vars: I) -> Result<AppConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut tree = serde_json::to_value(AppConfig::default())
        .map_err(|e| format.parse_error(e.to_string()))?;

    // A truncated file mid-save reads as empty or null; never publish defaults for it.
    let mut file_tree = match format.parse(content)? {
        Value::Null => return Err(format.parse_error("document is empty")),
        obj @ Value::Object(_) => obj,
        _ => return Err(format.parse_error("top level must be a mapping of sections")),
    };
    fold_alias(&mut file_tree, "redis", "cache");
    merge(&mut tree, file_tree);

    apply_env_overrides(&mut tree, vars)?;

    let config: AppConfig =
        serde_json::from_value(tree).map_err(|e| format.parse_error(e.to_string()))?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Recursively overlay `overlay` onto `base`. Mappings merge, nulls are skipped,
/// everything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        // `password:` or a bare `cache:` section leaves the default in place.
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Move `alias` onto `canonical` so both spellings of a section land in one place.
fn fold_alias(tree: &mut Value, alias: &str, canonical: &str) {
    let Value::Object(map) = tree else {
        return;
    };
    if let Some(aliased) = map.remove(alias) {
        match map.get_mut(canonical) {
            Some(existing) => {
                let explicit = std::mem::replace(existing, aliased);
                merge(existing, explicit);
            }
            None => {
                map.insert(canonical.to_string(), aliased);
            }
        }
    }
}
