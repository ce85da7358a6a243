//! Middleware layer.
//!
//! A middleware is a function that takes a [`Handler`](crate::Handler) and
//! returns a [`Handler`](crate::Handler). Chain them by nesting; the
//! outermost call runs first:
//!
//! ```rust
//! use webapputil::middleware::request_id::{UuidRequestId, request_id, with_request_id};
//! use webapputil::{HandlerService, Request, Response};
//!
//! async fn show(req: Request) -> Response {
//!     Response::text(request_id(&req).to_owned())
//! }
//!
//! let svc = HandlerService::new(with_request_id(show, UuidRequestId));
//! # let _ = svc;
//! ```
//!
//! Available:
//! - [`request_id`]: per-request identifier stored in the request context

pub mod request_id;
