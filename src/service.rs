//! Bridge from [`Handler`] to hyper.
//!
//! [`HandlerService`] implements `hyper::service::Service`, so a handler
//! chain plugs into whatever connection driver the application runs
//! (`hyper::server::conn`, `hyper_util`'s auto builder, ...). Binding,
//! accepting and shutdown stay with the application.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::service::Service;
use tracing::warn;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// A [`Handler`] served as a hyper `Service`.
///
/// Cloning is one atomic increment; clone it into every connection task.
#[derive(Clone)]
pub struct HandlerService {
    handler: BoxedHandler,
}

impl HandlerService {
    pub fn new(handler: impl Handler) -> Self {
        Self { handler: handler.into_boxed_handler() }
    }
}

impl fmt::Debug for HandlerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerService").finish_non_exhaustive()
    }
}

impl<B> Service<http::Request<B>> for HandlerService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move { Ok(dispatch(handler, req).await.into_inner()) })
    }
}

/// Collects the body, then runs the handler. Never fails: an unreadable
/// body becomes `400 Bad Request`.
async fn dispatch<B>(handler: BoxedHandler, req: http::Request<B>) -> Response
where
    B: Body,
    B::Error: fmt::Display,
{
    let (head, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(method = %head.method, path = head.uri.path(), "failed to read request body: {e}");
            return Response::status(StatusCode::BAD_REQUEST);
        }
    };

    handler.call(Request::from_parts(head, body)).await
}
