//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values make sense together.
//! Every problem is reported, not just the first one found.

use std::fmt;
use std::path::{Component, Path};

use axum::http::HeaderName;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.upstream.resolve_endpoint() {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::new(
                "upstream.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("upstream.endpoint", e.to_string())),
    }

    if config.upstream.query_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "upstream.query_key",
            "credential is empty (set SEARCH_QUERY_KEY)",
        ));
    }

    if HeaderName::from_bytes(config.upstream.key_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "upstream.key_header",
            format!("'{}' is not a valid header name", config.upstream.key_header),
        ));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be greater than zero"));
    }

    let index = Path::new(&config.assets.index_file);
    let plain = index
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if config.assets.index_file.is_empty() || !plain {
        errors.push(ValidationError::new(
            "assets.index_file",
            format!("'{}' must be a relative file name", config.assets.index_file),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
