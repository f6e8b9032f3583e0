//! Lazily constructed HTTP request handlers.
//!
//! [`LazyHandler`] wraps a factory and builds its handler on the first
//! request, reusing it afterwards and forwarding termination when the built
//! handler supports it. The `http`, `config` and `lifecycle` modules serve
//! configured lazy mounts over axum.

pub mod config;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use handler::{lazy, Handler, HandlerService, LazyHandler, RequestType, Terminable};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
