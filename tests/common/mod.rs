//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use tower::BoxError;

use lazy_handler::handler::{
    CallableHandler, Error, HandlerFuture, Request, Response,
};
use lazy_handler::{Handler, RequestType, Terminable};

/// Build a request for `path` with an empty body.
pub fn request(path: &str) -> Request {
    axum::http::Request::builder().uri(path).body(Bytes::new()).unwrap()
}

/// Read a response body into a string.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Handler that always answers with `body`.
pub fn text_handler(
    body: &'static str,
) -> CallableHandler<impl Fn(&Request) -> Result<Response, BoxError> + Send + Sync> {
    CallableHandler::new(move |_| Ok(body.into_response()))
}

/// Wrap `make` into an infallible factory that counts its invocations.
pub fn counting<H>(
    make: impl Fn() -> H + Send + Sync,
) -> (Arc<AtomicUsize>, impl Fn() -> Result<H, Infallible> + Send + Sync) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let factory = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Infallible>(make())
    };
    (calls, factory)
}

/// Terminable handler that records what it saw.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    calls: AtomicUsize,
    handled: Mutex<Vec<(RequestType, bool)>>,
    terminated: Mutex<Vec<(String, String)>>,
}

impl RecordingHandler {
    /// `(request_type, catch)` of every handled request.
    pub fn handled(&self) -> Vec<(RequestType, bool)> {
        self.handled.lock().unwrap().clone()
    }

    /// `(path, x-call header)` of every terminated request/response pair.
    pub fn terminated(&self) -> Vec<(String, String)> {
        self.terminated.lock().unwrap().clone()
    }
}

impl Handler for RecordingHandler {
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        self.handled.lock().unwrap().push((request_type, catch));
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut response = format!("handled {}", request.uri().path()).into_response();
        response
            .headers_mut()
            .insert("x-call", HeaderValue::from(call));
        Box::pin(async move { Ok::<_, Error>(response) })
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl Terminable for RecordingHandler {
    fn terminate(&self, request: &Request, response: &Response) -> Result<(), Error> {
        let call = response
            .headers()
            .get("x-call")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.terminated
            .lock()
            .unwrap()
            .push((request.uri().path().to_string(), call));
        Ok(())
    }
}

/// Dispatches to the handler mounted under the longest matching path prefix,
/// falling back to `app`.
pub struct UrlMap {
    app: Box<dyn Handler>,
    map: Vec<(String, Box<dyn Handler>)>,
}

impl UrlMap {
    pub fn new(app: impl Handler + 'static) -> Self {
        Self {
            app: Box::new(app),
            map: Vec::new(),
        }
    }

    pub fn mount(mut self, prefix: &str, handler: impl Handler + 'static) -> Self {
        self.map.push((prefix.to_string(), Box::new(handler)));
        self.map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }
}

impl Handler for UrlMap {
    fn handle<'a>(
        &'a self,
        request: &'a Request,
        request_type: RequestType,
        catch: bool,
    ) -> HandlerFuture<'a, Response> {
        let path = request.uri().path();
        let handler = self
            .map
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map_or(&self.app, |(_, handler)| handler);
        handler.handle(request, request_type, catch)
    }
}
