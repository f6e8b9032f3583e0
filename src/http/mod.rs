//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → axum router (nested by mount path prefix)
//!     → HandlerService → LazyHandler → mount.rs handler (built on first hit)
//!     → Send to client
//! ```

pub mod mount;
pub mod server;

pub use mount::{lazy_mount, MountHandler};
pub use server::HttpServer;
