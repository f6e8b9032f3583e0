//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes valid)
//! - Detect conflicting or unmountable path prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use axum::http::StatusCode;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("body limit must be greater than zero")]
    ZeroBodyLimit,

    #[error("mount prefix '{0}' must start with '/' and must not be '/'")]
    InvalidPrefix(String),

    #[error("mount prefix '{0}' must not contain '{{' or '}}' or segments starting with ':' or '*'")]
    WildcardPrefix(String),

    #[error("mount prefix '{0}' is declared more than once")]
    DuplicatePrefix(String),

    #[error("mount '{prefix}' has invalid status {status}")]
    InvalidStatus { prefix: String, status: u16 },

    #[error("mount '{0}' needs exactly one of body or body_file")]
    BodySource(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut seen = HashSet::new();
    for mount in &config.mounts {
        let prefix = &mount.path_prefix;
        if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        } else if has_route_syntax(prefix) {
            errors.push(ValidationError::WildcardPrefix(prefix.clone()));
        } else if !seen.insert(prefix.trim_end_matches('/')) {
            errors.push(ValidationError::DuplicatePrefix(prefix.clone()));
        }

        if StatusCode::from_u16(mount.status).is_err() {
            errors.push(ValidationError::InvalidStatus {
                prefix: prefix.clone(),
                status: mount.status,
            });
        }
        if mount.body.is_some() == mount.body_file.is_some() {
            errors.push(ValidationError::BodySource(prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Prefixes are nested into the axum router, which panics on captures and
/// wildcards (including the pre-0.8 `:name` / `*rest` forms).
fn has_route_syntax(prefix: &str) -> bool {
    prefix.contains(['{', '}'])
        || prefix
            .split('/')
            .any(|segment| segment.starts_with([':', '*']))
}
