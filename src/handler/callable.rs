//! Closure-backed handlers.
//!
//! # Responsibilities
//! - Adapt a plain closure into a [`Handler`]
//! - Honor the `catch` flag: failures become a 500 response or an `Err`
//! - Optionally carry a termination closure

use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures_util::future;
use tower::BoxError;

use super::{Error, Handler, HandlerFuture, Request, RequestType, Response, Terminable};

/// Handler that calls a closure for every request.
pub struct CallableHandler<F> {
    callable: F,
}

impl<F> CallableHandler<F>
where
    F: Fn(&Request) -> Result<Response, BoxError> + Send + Sync,
{
    pub fn new(callable: F) -> Self {
        Self { callable }
    }

    /// Attach a termination closure, making the handler terminable.
    pub fn on_terminate<T>(self, terminate: T) -> TerminableCallable<F, T>
    where
        T: Fn(&Request, &Response) -> Result<(), BoxError> + Send + Sync,
    {
        TerminableCallable {
            inner: self,
            terminate,
        }
    }
}

impl<F> Handler for CallableHandler<F>
where
    F: Fn(&Request) -> Result<Response, BoxError> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        _request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        Box::pin(future::ready(call(&self.callable, request, catch)))
    }
}

/// Closure-backed handler with a termination closure.
pub struct TerminableCallable<F, T> {
    inner: CallableHandler<F>,
    terminate: T,
}

impl<F, T> Handler for TerminableCallable<F, T>
where
    F: Fn(&Request) -> Result<Response, BoxError> + Send + Sync,
    T: Fn(&Request, &Response) -> Result<(), BoxError> + Send + Sync,
{
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        self.inner.handle(request, request_type, catch)
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl<F, T> Terminable for TerminableCallable<F, T>
where
    F: Fn(&Request) -> Result<Response, BoxError> + Send + Sync,
    T: Fn(&Request, &Response) -> Result<(), BoxError> + Send + Sync,
{
    fn terminate(&self, request: &Request, response: &Response) -> Result<(), Error> {
        (self.terminate)(request, response).map_err(Error::Terminate)
    }
}

fn call<F>(callable: &F, request: &Request, catch: bool) -> Result<Response, Error>
where
    F: Fn(&Request) -> Result<Response, BoxError>,
{
    match callable(request) {
        Ok(response) => Ok(response),
        Err(err) if catch => {
            tracing::error!(
                path = %request.uri().path(),
                error = %err,
                "Handler failed, answering 500"
            );
            Ok((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response())
        }
        Err(err) => Err(Error::Handler(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn request(path: &str) -> Request {
        axum::http::Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    fn failing() -> CallableHandler<impl Fn(&Request) -> Result<Response, BoxError> + Send + Sync> {
        CallableHandler::new(|_| Err("boom".into()))
    }

    #[tokio::test]
    async fn test_caught_failure_becomes_500() {
        let handler = failing();
        let req = request("/");

        let response = handler.handle(&req, RequestType::Main, true).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_uncaught_failure_propagates() {
        let handler = failing();
        let req = request("/");

        let err = handler.handle(&req, RequestType::Main, false).await.unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_plain_callable_is_not_terminable() {
        let handler = CallableHandler::new(|_| Ok("ok".into_response()));
        assert!(handler.as_terminable().is_none());
    }

    #[tokio::test]
    async fn test_terminate_runs_closure() {
        let terminated = Arc::new(AtomicBool::new(false));
        let flag = terminated.clone();
        let handler = CallableHandler::new(|_| Ok("ok".into_response())).on_terminate(
            move |_, _| {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
        );

        let req = request("/");
        let response = handler.handle(&req, RequestType::Main, true).await.unwrap();
        handler
            .as_terminable()
            .expect("terminable")
            .terminate(&req, &response)
            .unwrap();

        assert!(terminated.load(Ordering::SeqCst));
    }

    #[test]
    fn test_terminate_failure_is_reported() {
        let handler = CallableHandler::new(|_| Ok("ok".into_response()))
            .on_terminate(|_, _| Err("cleanup failed".into()));

        let req = request("/");
        let response = "ok".into_response();
        let err = handler.terminate(&req, &response).unwrap_err();
        assert!(matches!(err, Error::Terminate(_)));
    }
}
