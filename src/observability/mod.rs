//! Observability subsystem.
//!
//! Handlers and the server emit `tracing` events with structured fields;
//! logging.rs installs the subscriber that formats them.

pub mod logging;
