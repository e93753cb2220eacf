//! Request handler traits and implementations.
//!
//! A handler is any async function or closure that receives the per-request
//! [`RequestContext`] and resolves to either `Some(ResponseBuilder)` — a
//! response, which stops the chain — or `None`, which passes control to the
//! next handler. Synchronous and asynchronous handlers share the single
//! [`Handler`] trait whose invocation always returns an awaitable future, so
//! the dispatcher never branches on "is this async".
//!
//! # Examples
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::handler::HandlerResult;
//! use arbor::response::ResponseBuilder;
//!
//! async fn hello(_ctx: RequestContext) -> HandlerResult {
//!   Ok(Some(ResponseBuilder::new().set_data("Hello, World!")))
//! }
//!
//! async fn pass_through(_ctx: RequestContext) -> HandlerResult {
//!   // Returning `None` falls through to the next handler in the chain.
//!   Ok(None)
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::context::RequestContext;
use crate::response::ResponseBuilder;

/// Outcome of one handler invocation.
///
/// `Ok(Some(_))` produces a response and short-circuits the chain.
/// `Ok(None)` falls through. `Err(_)` is caught at the dispatcher boundary
/// and translated into a generic `500` response.
pub type HandlerResult = anyhow::Result<Option<ResponseBuilder>>;

/// Boxed future returned by erased handler invocations.
pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// A middleware or terminal handler in a route's chain.
#[doc(alias = "handler")]
pub trait Handler: Send + Sync + 'static {
  /// Invokes the handler against the request context.
  fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
  F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = HandlerResult> + Send + 'static,
{
  fn call(&self, ctx: RequestContext) -> HandlerFuture {
    Box::pin(self(ctx))
  }
}

/// Cheaply clonable, type-erased handler stored in the route tree.
///
/// Route chains are concatenated at match time, so the erased handler is an
/// `Arc` and cloning only bumps a reference count.
#[derive(Clone)]
pub struct BoxHandler(Arc<dyn Handler>);

impl BoxHandler {
  /// Erases a concrete handler into a boxed one.
  pub fn new<H>(handler: H) -> Self
  where
    H: Handler,
  {
    Self(Arc::new(handler))
  }

  /// Invokes the underlying handler.
  pub fn call(&self, ctx: RequestContext) -> HandlerFuture {
    self.0.call(ctx)
  }
}

impl std::fmt::Debug for BoxHandler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxHandler").finish_non_exhaustive()
  }
}
