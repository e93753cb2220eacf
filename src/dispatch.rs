//! Request dispatch: executing a matched handler chain under the
//! short-circuiting rules.
//!
//! Handlers run strictly in order and each one is awaited before the next is
//! invoked. The first handler that returns a response stops the chain. A
//! chain where every handler falls through is a programming error in the
//! route definition and is surfaced as a `500` — never as a silently empty
//! body. Handler failures are logged with their full error chain but only a
//! generic `500` ever reaches the client; a request is never left
//! unanswered and internal errors never leak into response bodies.

use crate::context::RequestContext;
use crate::error::ArborError;
use crate::handler::BoxHandler;
use crate::response::ResponseBuilder;
use crate::response::prepare::PreparedResponse;
use crate::router::SealedRouter;

impl SealedRouter {
  /// Matches and dispatches one request, always producing a response.
  ///
  /// No-match (including a structurally matched path with no chain for the
  /// request method) becomes `404 Not Found` without invoking any handler.
  /// Matcher errors and handler failures become `500 Internal Server Error`.
  pub async fn dispatch(&self, ctx: RequestContext) -> PreparedResponse {
    let method = ctx.method().clone();
    let path = ctx.path().to_string();

    let matched = match self.match_route(&path, &method, &ctx) {
      Ok(matched) => matched,
      Err(err) => {
        err.report();
        return internal_error();
      }
    };

    let Some(route) = matched else {
      return not_found();
    };

    run_chain(&route.handlers, ctx).await
  }
}

/// Runs the composed chain in order, stopping at the first response.
async fn run_chain(handlers: &[BoxHandler], ctx: RequestContext) -> PreparedResponse {
  for handler in handlers {
    match handler.call(ctx.clone()).await {
      Ok(Some(response)) => return response.finalize().prepare(),
      Ok(None) => {}
      Err(err) => {
        tracing::error!("handler failed: {err:#}");
        return internal_error();
      }
    }
  }

  ArborError::error(
    "handler-return-none",
    "all route handlers completed without producing a response; \
     at least one must respond",
  )
  .report();
  internal_error()
}

fn not_found() -> PreparedResponse {
  ResponseBuilder::new()
    .set_status(404)
    .set_message("Not Found")
    .finalize()
    .prepare()
}

fn internal_error() -> PreparedResponse {
  ResponseBuilder::new()
    .set_status(500)
    .set_message("Internal Server Error")
    .finalize()
    .prepare()
}
