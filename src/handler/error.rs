//! Errors surfaced by handlers.

use tower::BoxError;

/// Error returned from handling or terminating a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The factory of a lazy handler failed to build its handler.
    #[error("handler factory failed: {0}")]
    Factory(#[source] BoxError),

    /// The handler failed and was not asked to catch the failure.
    #[error("request handling failed: {0}")]
    Handler(#[source] BoxError),

    /// Post-response cleanup failed.
    #[error("request termination failed: {0}")]
    Terminate(#[source] BoxError),
}
