//! Lazily constructed handlers.
//!
//! # Responsibilities
//! - Defer building a handler until the first request reaches it
//! - Cache the built handler and reuse it for every later request
//! - Forward termination only when the built handler is terminable
//!
//! # Design Decisions
//! - `tokio::sync::OnceCell` guards construction: concurrent first requests
//!   run the factory once, the rest wait for its result
//! - A failed factory caches nothing; the next request tries again
//! - Terminating before anything was built is a no-op and never runs the factory

use std::fmt;

use tokio::sync::OnceCell;
use tower::BoxError;

use super::{Error, Handler, HandlerFuture, Request, RequestType, Response, Terminable};

/// Handler built by `factory` on first use.
pub struct LazyHandler<F, H> {
    factory: F,
    app: OnceCell<H>,
}

impl<F, H, E> LazyHandler<F, H>
where
    F: Fn() -> Result<H, E>,
    E: Into<BoxError>,
{
    /// Wrap `factory`. Nothing is built until the first request.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            app: OnceCell::new(),
        }
    }

    /// Returns true once the wrapped handler has been built.
    pub fn is_initialized(&self) -> bool {
        self.app.initialized()
    }

    /// The wrapped handler, if it has been built.
    pub fn get(&self) -> Option<&H> {
        self.app.get()
    }

    async fn app(&self) -> Result<&H, Error> {
        self.app
            .get_or_try_init(|| async {
                tracing::debug!("Building lazily wrapped handler");
                (self.factory)().map_err(|err| {
                    let err = err.into();
                    tracing::warn!(error = %err, "Handler factory failed");
                    Error::Factory(err)
                })
            })
            .await
    }
}

impl<F, H, E> Handler for LazyHandler<F, H>
where
    F: Fn() -> Result<H, E> + Send + Sync,
    H: Handler,
    E: Into<BoxError>,
{
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        Box::pin(async move {
            let app = self.app().await?;
            app.handle(request, request_type, catch).await
        })
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl<F, H, E> Terminable for LazyHandler<F, H>
where
    F: Fn() -> Result<H, E> + Send + Sync,
    H: Handler,
    E: Into<BoxError>,
{
    fn terminate(&self, request: &Request, response: &Response) -> Result<(), Error> {
        match self.app.get().and_then(Handler::as_terminable) {
            Some(app) => app.terminate(request, response),
            None => Ok(()),
        }
    }
}

impl<F, H> fmt::Debug for LazyHandler<F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyHandler")
            .field("initialized", &self.app.initialized())
            .finish_non_exhaustive()
    }
}

/// Shortcut for [`LazyHandler::new`].
pub fn lazy<F, H, E>(factory: F) -> LazyHandler<F, H>
where
    F: Fn() -> Result<H, E>,
    E: Into<BoxError>,
{
    LazyHandler::new(factory)
}
