//! Handlers served under configured mounts.
//!
//! # Responsibilities
//! - Build a mount's handler from its config (status, content type, body)
//! - Wrap that construction in a [`LazyHandler`] so it runs on first request
//! - Log completed request cycles through the termination hook

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use futures_util::future;
use tower::BoxError;

use crate::config::MountConfig;
use crate::handler::{
    lazy, Error, Handler, HandlerFuture, LazyHandler, Request, RequestType, Response, Terminable,
};

/// Fixed-response handler built from a [`MountConfig`].
#[derive(Debug)]
pub struct MountHandler {
    prefix: String,
    status: StatusCode,
    content_type: HeaderValue,
    body: Bytes,
}

impl MountHandler {
    /// Build the handler, reading `body_file` if the mount uses one.
    ///
    /// The read is a blocking `std::fs::read`. Under [`lazy_mount`] it runs
    /// on a runtime worker during the first request, which suits the small
    /// static bodies mounts are meant for.
    pub fn build(config: &MountConfig) -> Result<Self, BoxError> {
        let status = StatusCode::from_u16(config.status)?;
        let content_type = HeaderValue::from_str(&config.content_type)?;
        let body = match (&config.body, &config.body_file) {
            (Some(body), _) => Bytes::from(body.clone()),
            (None, Some(path)) => Bytes::from(std::fs::read(path)?),
            (None, None) => {
                return Err(format!("mount '{}' has no body", config.path_prefix).into())
            }
        };

        tracing::info!(
            prefix = %config.path_prefix,
            status = %status,
            bytes = body.len(),
            "Mount handler built"
        );

        Ok(Self {
            prefix: config.path_prefix.clone(),
            status,
            content_type,
            body,
        })
    }
}

impl Handler for MountHandler {
    fn handle<'a>(
        &'a self,
        _request: &'a Request,
        _request_type: RequestType,
        _catch: bool,
    ) -> HandlerFuture<'a, Response> {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, self.content_type.clone());
        Box::pin(future::ok::<_, Error>(response))
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl Terminable for MountHandler {
    fn terminate(&self, request: &Request, response: &Response) -> Result<(), Error> {
        tracing::debug!(
            prefix = %self.prefix,
            path = %request.uri().path(),
            status = %response.status(),
            "Request cycle finished"
        );
        Ok(())
    }
}

/// Handler for `config`, built on the first request it receives.
///
/// A `body_file` is read with blocking I/O inside that first request; the
/// worker thread stalls for the duration of the read. Keep mounted files small.
pub fn lazy_mount(
    config: MountConfig,
) -> LazyHandler<impl Fn() -> Result<MountHandler, BoxError> + Send + Sync, MountHandler> {
    lazy(move || MountHandler::build(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        axum::http::Request::builder().uri("/").body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_inline_body_response() {
        let mut config = MountConfig::inline("/created", "made");
        config.status = 201;
        config.content_type = "text/html".into();

        let handler = MountHandler::build(&config).unwrap();
        let response = handler.handle(&request(), RequestType::Main, true).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"made");
    }

    #[test]
    fn test_missing_body_file_fails_build() {
        let config = MountConfig::file("/missing", "/nonexistent/body.txt");
        assert!(MountHandler::build(&config).is_err());
    }

    #[tokio::test]
    async fn test_lazy_mount_reads_file_on_first_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.txt");
        let handler = lazy_mount(MountConfig::file("/late", &path));

        std::fs::write(&path, "written after mount").unwrap();
        assert!(!handler.is_initialized());

        let response = handler.handle(&request(), RequestType::Main, true).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"written after mount");
    }
}
