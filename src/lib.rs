//! # webapputil
//!
//! Two small conveniences for HTTP services built on hyper.
//!
//! - [`problem`]: RFC 7807 problem-detail responses
//!   (`Content-Type: application/problem+json`).
//! - [`middleware::request_id`]: one identifier per inbound request, kept in
//!   the request's extensions and on a `request` tracing span so handlers and
//!   logs can correlate work to that request.
//!
//! Around them sits just enough host surface to use them: [`Request`],
//! [`Response`], the [`Handler`] capability that middleware wraps, and
//! [`HandlerService`] to hand a handler chain to hyper.
//!
//! ## Quick start
//!
//! ```rust
//! use http::StatusCode;
//! use webapputil::middleware::request_id::{HeaderOr, UuidRequestId, request_id, with_request_id};
//! use webapputil::problem::{Problem, send_problem};
//! use webapputil::{HandlerService, Request, Response};
//!
//! async fn get_account(req: Request) -> Response {
//!     let problem = Problem::from_status(StatusCode::NOT_FOUND)
//!         .with_detail("no such account")
//!         .with_instance(format!("/requests/{}", request_id(&req)));
//!
//!     send_problem(Response::builder(), StatusCode::NOT_FOUND, &problem)
//!         .unwrap_or_else(|e| {
//!             tracing::error!("failed to send problem: {e}");
//!             Response::status(StatusCode::INTERNAL_SERVER_ERROR)
//!         })
//! }
//!
//! let svc = HandlerService::new(with_request_id(get_account, HeaderOr::new(UuidRequestId)));
//! // Serve `svc` with hyper's connection builders.
//! # let _ = svc;
//! ```

mod error;
mod handler;
mod request;
mod response;
mod service;

pub mod middleware;
pub mod problem;

pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use service::HandlerService;
