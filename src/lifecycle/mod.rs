//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C or Shutdown::trigger → ShutdownSignal resolves
//!     → axum stops accepting → in-flight requests drain → exit
//! ```

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
