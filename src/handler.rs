//! Handler trait and type erasure.
//!
//! Two kinds of value are handlers:
//!
//! - any `Fn(Request) -> impl Future<Output = impl IntoResponse>` that is
//!   `Send + Sync + 'static`, plain `async fn`s included;
//! - the handler types middleware returns, such as
//!   [`RequestIdHandler`](crate::middleware::request_id::RequestIdHandler).
//!
//! Both erase to a [`BoxedHandler`]. Middleware stores its downstream
//! handler boxed and implements [`ErasedHandler`] itself, so a chain of N
//! layers costs N virtual calls and one future allocation per layer:
//!
//! ```text
//! with_request_id(with_request_id(show, a), b)
//!        ↓ HandlerService::new
//! Arc<RequestIdHandler{ b, next: Arc<RequestIdHandler{ a, next: Arc<AsyncFn(show)> }> }>
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future every erased handler returns.
#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface behind [`Handler`].
#[doc(hidden)]
pub trait ErasedHandler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A handler shared by every request it serves.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Implemented for every valid request handler.
///
/// Sealed: the impls in this crate are the only ones.
pub trait Handler: sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

impl<F, Fut, R> sealed::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(AsyncFn(self))
    }
}

/// An async function seen as an [`ErasedHandler`].
struct AsyncFn<F>(F);

impl<F, Fut, R> ErasedHandler for AsyncFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
