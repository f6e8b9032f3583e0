//! Request handler capabilities.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → service.rs (buffer body, build handler Request)
//!     → Handler::handle (lazy.rs constructs delegate on first use)
//!     → Response back to axum
//!     → Terminable::terminate (only if the delegate opted in)
//! ```
//!
//! # Design Decisions
//! - Termination is an optional capability, discovered at runtime through
//!   `Handler::as_terminable` rather than a type hierarchy
//! - Request bodies are buffered so the same request can be shown to
//!   `handle` and later to `terminate`
//! - Handlers are `Send + Sync` and shared behind `Arc`

pub mod callable;
pub mod error;
pub mod lazy;
pub mod service;

use axum::body::{Body, Bytes};
use futures_util::future::BoxFuture;

pub use callable::{CallableHandler, TerminableCallable};
pub use error::Error;
pub use lazy::{lazy, LazyHandler};
pub use service::HandlerService;

/// Request seen by handlers. The body is fully buffered.
pub type Request = axum::http::Request<Bytes>;

/// Response produced by handlers.
pub type Response = axum::http::Response<Body>;

/// Future returned by [`Handler::handle`].
pub type HandlerFuture<'a, T> = BoxFuture<'a, Result<T, Error>>;

/// Whether a request came straight from the client or was issued internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestType {
    /// Top-level request received from a client.
    #[default]
    Main,
    /// Request issued while handling another request.
    Sub,
}

/// Something that turns a request into a response.
pub trait Handler: Send + Sync {
    /// Handle `request`.
    ///
    /// When `catch` is true the handler is expected to convert its own
    /// failures into an error response instead of returning `Err`.
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response>;

    /// Returns the termination capability if this handler has one.
    fn as_terminable(&self) -> Option<&dyn Terminable> {
        None
    }
}

/// Handler that wants to run cleanup once a response has been produced.
pub trait Terminable: Handler {
    /// Finish the request/response cycle for `request` and its `response`.
    fn terminate(&self, request: &Request, response: &Response) -> Result<(), Error>;
}

impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        (**self).handle(request, request_type, catch)
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        (**self).as_terminable()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        (**self).handle(request, request_type, catch)
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        (**self).as_terminable()
    }
}
