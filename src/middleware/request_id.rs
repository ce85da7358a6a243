//! Request-id propagation.
//!
//! [`with_request_id`] asks a [`MakeRequestId`] for an identifier once per
//! request, stores it in the request's extensions and runs the wrapped
//! handler inside a `request` tracing span carrying `request_id`. Handlers
//! read it back with [`request_id`].
//!
//! The extension key is a private type. Code outside this module can neither
//! read the slot directly nor overwrite it.

use std::sync::Arc;

use http::HeaderName;
use tracing::Instrument;
use uuid::Uuid;

use crate::handler::sealed::Sealed;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::request::Request;

/// Conventional header for client-supplied request ids.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone, Debug)]
struct RequestIdSlot(String);

// ── Generators ────────────────────────────────────────────────────────────────

/// Produces the identifier for one request.
///
/// Any `Fn(&Request) -> String + Send + Sync + 'static` is a generator:
///
/// ```rust
/// use webapputil::middleware::request_id::with_request_id;
/// use webapputil::{Request, Response};
///
/// # async fn show(_: Request) -> Response { Response::text("") }
/// let handler = with_request_id(show, |_req: &Request| "abc-123".to_owned());
/// # let _ = handler;
/// ```
pub trait MakeRequestId: Send + Sync + 'static {
    fn make_request_id(&self, req: &Request) -> String;
}

impl<F> MakeRequestId for F
where
    F: Fn(&Request) -> String + Send + Sync + 'static,
{
    fn make_request_id(&self, req: &Request) -> String {
        self(req)
    }
}

/// A fresh random UUID v4 for every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id(&self, _req: &Request) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Reuses the id a client or proxy already sent in a header, falling back to
/// another generator when the header is missing, empty or not visible ASCII.
#[derive(Clone, Debug)]
pub struct HeaderOr<M> {
    header: HeaderName,
    fallback: M,
}

impl<M: MakeRequestId> HeaderOr<M> {
    /// Reads [`X_REQUEST_ID`].
    pub fn new(fallback: M) -> Self {
        Self::with_header(X_REQUEST_ID, fallback)
    }

    pub fn with_header(header: HeaderName, fallback: M) -> Self {
        Self { header, fallback }
    }
}

impl<M: MakeRequestId> MakeRequestId for HeaderOr<M> {
    fn make_request_id(&self, req: &Request) -> String {
        match req.header(&self.header).map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => self.fallback.make_request_id(req),
        }
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Wraps `next` so every request carries an id produced by `make_id`.
///
/// `make_id` runs exactly once per request, before `next`.
pub fn with_request_id<M: MakeRequestId>(next: impl Handler, make_id: M) -> RequestIdHandler<M> {
    RequestIdHandler { next: next.into_boxed_handler(), make_id }
}

/// The handler [`with_request_id`] returns.
pub struct RequestIdHandler<M> {
    next: BoxedHandler,
    make_id: M,
}

impl<M: MakeRequestId> ErasedHandler for RequestIdHandler<M> {
    fn call(&self, mut req: Request) -> BoxFuture {
        let id = self.make_id.make_request_id(&req);
        let span = tracing::info_span!("request", request_id = %id);
        req.extensions_mut().insert(RequestIdSlot(id));
        Box::pin(self.next.call(req).instrument(span))
    }
}

impl<M: MakeRequestId> Sealed for RequestIdHandler<M> {}

impl<M: MakeRequestId> Handler for RequestIdHandler<M> {
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

// ── Accessors ─────────────────────────────────────────────────────────────────

/// The id [`with_request_id`] assigned to `req`.
///
/// # Panics
///
/// Panics if `req` never went through [`with_request_id`]. That is a wiring
/// bug: the middleware must wrap every handler that calls this.
#[track_caller]
pub fn request_id(req: &Request) -> &str {
    match try_request_id(req) {
        Some(id) => id,
        None => panic!(
            "request id missing for {} {}: handler is not wrapped by with_request_id",
            req.method(),
            req.path(),
        ),
    }
}

/// Like [`request_id`], but `None` outside the middleware.
pub fn try_request_id(req: &Request) -> Option<&str> {
    req.extensions().get::<RequestIdSlot>().map(|slot| slot.0.as_str())
}
