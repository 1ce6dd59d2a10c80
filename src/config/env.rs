//! Environment variable overrides.
//!
//! Variables named `APP_<SECTION>_<KEY>` replace `<section>.<key>` in the
//! layered configuration tree. Matching is case-insensitive and the key may
//! itself contain underscores, so `APP_LOG_FILE_PATH` sets `log.file_path`.
//! Values are coerced to the JSON type already present at that position.

use serde_json::Value;

use crate::config::loader::ConfigError;

/// Prefix every override variable must carry.
pub const ENV_PREFIX: &str = "APP_";

/// Where override variables come from.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// Read `std::env::vars()` at load time.
    #[default]
    Process,
    /// A fixed set of variables.
    Fixed(Vec<(String, String)>),
    /// No overrides.
    Empty,
}

impl EnvSource {
    pub fn vars(&self) -> Vec<(String, String)> {
        match self {
            EnvSource::Process => std::env::vars().collect(),
            EnvSource::Fixed(vars) => vars.clone(),
            EnvSource::Empty => Vec::new(),
        }
    }
}

/// Apply `APP_*` overrides to `tree`. Returns the number of keys overridden.
pub fn apply_env_overrides<I>(tree: &mut Value, vars: I) -> Result<usize, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut applied = 0;

    for (name, raw) in vars {
        let upper = name.to_ascii_uppercase();
        let Some(rest) = upper.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let rest = rest.to_ascii_lowercase();
        let Some((section, key)) = rest.split_once('_') else {
            continue;
        };
        let section = if section == "redis" { "cache" } else { section };

        let Some(slot) = tree.get_mut(section).and_then(|s| s.get_mut(key)) else {
            tracing::debug!(variable = %name, "Ignoring override for unknown config key");
            continue;
        };

        *slot = coerce(slot, &raw).ok_or_else(|| ConfigError::Env {
            key: name.clone(),
            value: raw.clone(),
        })?;
        tracing::debug!(variable = %name, key = %format!("{}.{}", section, key), "Applied env override");
        applied += 1;
    }

    Ok(applied)
}

fn coerce(current: &Value, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    match current {
        Value::Bool(_) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) if n.is_f64() => raw.parse::<f64>().ok().map(Value::from),
        Value::Number(_) => raw.parse::<i64>().ok().map(Value::from),
        Value::String(_) | Value::Null => Some(Value::String(raw.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}
