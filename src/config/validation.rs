//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports non-zero, known log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before a snapshot is published, at startup and on every reload

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Log levels accepted in `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::new("server.port", "must be non-zero"));
    }
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::new("server.host", "must not be empty"));
    }
    if config.database.port == 0 {
        errors.push(ValidationError::new("database.port", "must be non-zero"));
    }
    if config.cache.port == 0 {
        errors.push(ValidationError::new("cache.port", "must be non-zero"));
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "log.level",
            format!("unknown level {:?}, expected one of {}", config.log.level, LOG_LEVELS.join(", ")),
        ));
    }
    if config.log.enable_file {
        if config.log.file_path.trim().is_empty() {
            errors.push(ValidationError::new("log.file_path", "required when enable_file is set"));
        }
        if config.log.max_size == 0 {
            errors.push(ValidationError::new("log.max_size", "must be positive when enable_file is set"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.log.level = "verbose".into();
        config.log.enable_file = true;
        config.log.file_path = String::new();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["server.port", "log.level", "log.file_path"]);
    }

    #[test]
    fn level_is_case_insensitive() {
        let mut config = AppConfig::default();
        config.log.level = "WARN".into();
        assert!(validate_config(&config).is_ok());
    }
}
