//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the lazy handler server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Handlers mounted under path prefixes, each built on first request.
    pub mounts: Vec<MountConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body buffered for a handler, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g., "info" or "lazy_handler=debug").
    /// `RUST_LOG` takes precedence when set.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "lazy_handler=info,tower_http=info".to_string(),
        }
    }
}

/// A handler mounted under a path prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MountConfig {
    /// Path prefix the handler is nested under (e.g., "/foo").
    pub path_prefix: String,

    /// Response status code.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response content type.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Inline response body.
    pub body: Option<String>,

    /// File whose contents become the response body. Read when the
    /// handler is built, i.e. on the first request to this mount.
    pub body_file: Option<PathBuf>,
}

impl MountConfig {
    /// Mount answering with an inline body and default status and content type.
    pub fn inline(path_prefix: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            status: default_status(),
            content_type: default_content_type(),
            body: Some(body.into()),
            body_file: None,
        }
    }

    /// Mount answering with the contents of `path`.
    pub fn file(path_prefix: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            status: default_status(),
            content_type: default_content_type(),
            body: None,
            body_file: Some(path.into()),
        }
    }
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}
