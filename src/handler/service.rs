//! Tower service adapter.
//!
//! # Responsibilities
//! - Expose any [`Handler`] as a `tower::Service` axum can mount
//! - Buffer the request body (bounded) into a handler [`Request`]
//! - Terminate the request once the response exists
//!
//! # Design Decisions
//! - Requests enter as `RequestType::Main` with `catch = true`
//! - Bodies over the limit get 413; any other body read failure gets 400
//! - An error escaping the handler becomes a 500; it never reaches hyper
//! - `terminate` runs inline once the response is built, before it is handed
//!   back to hyper. Cleanup time therefore adds to response latency; handlers
//!   with slow cleanup should spawn it themselves
//! - Termination failures are logged, the response is still sent

use std::convert::Infallible;
use std::error::Error as StdError;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures_util::future::BoxFuture;
use http_body_util::LengthLimitError;
use tower::Service;

use super::{Handler, Request, RequestType, Response};

/// Default cap on buffered request bodies (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// `tower::Service` wrapping a shared handler.
pub struct HandlerService<H> {
    handler: Arc<H>,
    body_limit: usize,
}

impl<H> HandlerService<H> {
    pub fn new(handler: H) -> Self {
        Self::from_arc(Arc::new(handler))
    }

    /// Wrap a handler that is also held elsewhere.
    pub fn from_arc(handler: Arc<H>) -> Self {
        Self {
            handler,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Set the maximum number of body bytes buffered per request.
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            body_limit: self.body_limit,
        }
    }
}

impl<H> Service<axum::extract::Request> for HandlerService<H>
where
    H: Handler + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: axum::extract::Request) -> Self::Future {
        let handler = self.handler.clone();
        let body_limit = self.body_limit;

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = match axum::body::to_bytes(body, body_limit).await {
                Ok(bytes) => bytes,
                Err(e) if is_length_limit(&e) => {
                    tracing::warn!(path = %parts.uri.path(), limit = body_limit, "Request body too large");
                    return Ok((StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response());
                }
                Err(e) => {
                    tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
                    return Ok((StatusCode::BAD_REQUEST, "Failed to read request body").into_response());
                }
            };
            let request = Request::from_parts(parts, body);

            let response = match handler.handle(&request, RequestType::Main, true).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(path = %request.uri().path(), error = %e, "Request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
                }
            };

            if let Some(terminable) = handler.as_terminable() {
                if let Err(e) = terminable.terminate(&request, &response) {
                    tracing::warn!(path = %request.uri().path(), error = %e, "Request termination failed");
                }
            }

            Ok(response)
        })
    }
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}
