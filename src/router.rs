//! HTTP request routing: registration, middleware attachment, and matching.
//!
//! This module provides the core `Router` struct that owns the route tree
//! during the single-threaded builder phase, and the `SealedRouter` handed to
//! the serving layer once registration is complete. Routes support dynamic
//! path parameters (`:name` segments), per-route handler chains, and two
//! middleware scopes: local middleware runs only when its node is the
//! terminal match, global middleware runs for the node and every descendant.
//!
//! Registration problems (bad paths, dynamic sibling conflicts, duplicate
//! registrations) are reported through the structured error channel and the
//! offending call is skipped — they never crash the process. The `try_`
//! variants return the error instead for callers that want to inspect it.
//!
//! # Examples
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::handler::BoxHandler;
//! use arbor::response::ResponseBuilder;
//! use arbor::router::Router;
//!
//! async fn list_users(_ctx: RequestContext) -> arbor::handler::HandlerResult {
//!   Ok(Some(ResponseBuilder::new().set_data("user list")))
//! }
//!
//! async fn show_user(ctx: RequestContext) -> arbor::handler::HandlerResult {
//!   Ok(Some(ResponseBuilder::new().set_data(ctx.param("id"))))
//! }
//!
//! let mut router = Router::new();
//! router.get("/user/list", list_users);
//! router.get("/user/:id", show_user);
//!
//! // Global middleware for the whole /user subtree.
//! router.attach(
//!   "/user/*",
//!   vec![BoxHandler::new(|_ctx: RequestContext| async { Ok(None) })],
//! );
//!
//! let sealed = router.seal();
//! ```

use std::sync::Arc;

use http::Method;

use crate::context::RequestContext;
use crate::error::ArborError;
use crate::handler::BoxHandler;
use crate::handler::Handler;
use crate::tree::RouteNode;
use crate::tree::Segment;

/// A successful match: the composed handler chain for one request.
///
/// The chain is, in order: every ancestor node's global middleware from root
/// to terminal, the terminal node's local middleware, then the handlers
/// registered for the matched method. Dynamic parameter values are written
/// into the request context during the walk, not carried here.
#[derive(Clone)]
pub struct MatchedRoute {
  /// Ordered handler chain to dispatch.
  pub handlers: Vec<BoxHandler>,
}

impl std::fmt::Debug for MatchedRoute {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MatchedRoute")
      .field("handlers", &self.handlers.len())
      .finish()
  }
}

/// Route registrar and middleware attacher for the builder phase.
///
/// All registration must complete before serving starts; call
/// [`Router::seal`] to convert the builder into an immutable, shareable
/// [`SealedRouter`]. Sealing consumes the builder, so late registration is a
/// compile error rather than a runtime hazard.
#[doc(alias = "router")]
#[derive(Default)]
pub struct Router {
  root: RouteNode,
}

impl Router {
  /// Creates a new, empty router.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a handler chain for a method and path.
  ///
  /// The path must start with `/`. Segments beginning with `:` are dynamic
  /// and bind the matched value to the parameter name. The handler list is
  /// the route's middleware interleaved with the terminal handler, in call
  /// order; it must not be empty.
  ///
  /// Violations are reported through the error channel and the registration
  /// is skipped. Registering the same method and exact path twice logs a
  /// warning and overwrites the previous chain for that method only.
  pub fn route(&mut self, method: Method, path: &str, handlers: Vec<BoxHandler>) -> &mut Self {
    if let Err(err) = self.try_route(method, path, handlers) {
      err.report();
    }
    self
  }

  /// Fallible twin of [`Router::route`], returning the rejection instead of
  /// reporting it.
  pub fn try_route(
    &mut self,
    method: Method,
    path: &str,
    handlers: Vec<BoxHandler>,
  ) -> Result<(), ArborError> {
    validate_path(path)?;
    if handlers.is_empty() {
      return Err(ArborError::error(
        "handler-missing",
        format!("route {path} was registered without any handler"),
      ));
    }

    let node = descend_registration(&mut self.root, path)?;

    if node.method_handlers.contains_key(&method) {
      ArborError::warn(
        "route-duplicate",
        format!(
          "route {path} with {method} method has already been registered; \
           the new handler chain overwrites the previous one"
        ),
      )
      .report();
    }

    node.method_handlers.insert(method, handlers);
    Ok(())
  }

  /// Registers a single `GET` handler.
  pub fn get<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
    self.route(Method::GET, path, vec![BoxHandler::new(handler)])
  }

  /// Registers a single `POST` handler.
  pub fn post<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
    self.route(Method::POST, path, vec![BoxHandler::new(handler)])
  }

  /// Registers a single `PUT` handler.
  pub fn put<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
    self.route(Method::PUT, path, vec![BoxHandler::new(handler)])
  }

  /// Registers a single `PATCH` handler.
  pub fn patch<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
    self.route(Method::PATCH, path, vec![BoxHandler::new(handler)])
  }

  /// Registers a single `DELETE` handler.
  pub fn delete<H: Handler>(&mut self, path: &str, handler: H) -> &mut Self {
    self.route(Method::DELETE, path, vec![BoxHandler::new(handler)])
  }

  /// Attaches middleware to a path without registering a method handler.
  ///
  /// A trailing `*` segment makes the middleware global: it applies to the
  /// node and every descendant, whichever descendant ends up being the
  /// terminal match. Without the wildcard the middleware is local and runs
  /// only when the path itself is the terminal match. Repeated calls append.
  ///
  /// Violations are reported through the error channel and the call is
  /// skipped, mirroring [`Router::route`].
  pub fn attach(&mut self, path: &str, middlewares: Vec<BoxHandler>) -> &mut Self {
    if let Err(err) = self.try_attach(path, middlewares) {
      err.report();
    }
    self
  }

  /// Fallible twin of [`Router::attach`].
  pub fn try_attach(
    &mut self,
    path: &str,
    middlewares: Vec<BoxHandler>,
  ) -> Result<(), ArborError> {
    if middlewares.is_empty() {
      return Err(ArborError::error(
        "handler-missing",
        format!("no middleware was provided for path {path}"),
      ));
    }

    // A missing leading slash is tolerated here: `api/*` means `/api/*`.
    let normalized = if path.starts_with('/') {
      path.to_string()
    } else {
      format!("/{path}")
    };

    let mut segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

    let global = segments.last().copied() == Some("*");
    if global {
      segments.pop();
    }

    let mut node = &mut self.root;
    for raw in segments {
      let segment = Segment::parse(raw);
      node = node.descend_mut(&segment, &normalized)?;
    }

    if global {
      node.global_middlewares.extend(middlewares);
    } else {
      node.local_middlewares.extend(middlewares);
    }
    Ok(())
  }

  /// Seals the router, producing the immutable matcher handed to the serving
  /// layer.
  ///
  /// The builder is consumed: once sealed, the tree can be shared across
  /// concurrently handled requests without locking because nothing mutates
  /// it anymore.
  #[must_use]
  pub fn seal(self) -> SealedRouter {
    SealedRouter {
      root: Arc::new(self.root),
    }
  }
}

impl std::fmt::Debug for Router {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Router").field("root", &self.root).finish()
  }
}

/// Immutable, shareable route tree produced by [`Router::seal`].
///
/// Cloning is cheap and clones share the same tree. Matching never mutates
/// the tree, so a `SealedRouter` may be consulted from any number of
/// concurrently handled requests.
#[derive(Clone)]
pub struct SealedRouter {
  root: Arc<RouteNode>,
}

impl SealedRouter {
  /// Matches a raw request path and method against the route tree.
  ///
  /// The fragment is discarded; query-string pairs are split on `&` then `=`
  /// and written into the context's query map. Duplicate and trailing
  /// slashes are ignored, so `//a/` matches the same route as `/a`. At each
  /// level an exact static child wins over the dynamic child; a dynamic
  /// match binds the segment value to the parameter name in the context.
  ///
  /// Returns `Ok(None)` when no route structurally matches **or** when the
  /// matched node has no chain for the method — method-miss is reported as
  /// no-match, and the caller decides how to surface it. An empty path is a
  /// caller bug and returns an error rather than `None`.
  pub fn match_route(
    &self,
    raw_path: &str,
    method: &Method,
    ctx: &RequestContext,
  ) -> Result<Option<MatchedRoute>, ArborError> {
    if raw_path.is_empty() {
      return Err(ArborError::error("path-empty", "path cannot be empty"));
    }

    // Discard the fragment, then peel off the query string.
    let without_fragment = raw_path.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
      Some((path, query)) => (path, Some(query)),
      None => (without_fragment, None),
    };

    if let Some(query) = query {
      for pair in query.split('&') {
        if pair.is_empty() {
          continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        ctx.set_query(key, value);
      }
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut handlers: Vec<BoxHandler> = Vec::new();
    let mut node: &RouteNode = &self.root;

    for segment in segments {
      handlers.extend_from_slice(&node.global_middlewares);

      if let Some(child) = node.children.get(segment) {
        node = child;
      } else if let Some(dynamic) = &node.dynamic {
        ctx.set_param(dynamic.name.clone(), segment);
        node = &dynamic.node;
      } else {
        return Ok(None);
      }
    }

    handlers.extend_from_slice(&node.global_middlewares);
    handlers.extend_from_slice(&node.local_middlewares);

    match node.method_handlers.get(method) {
      Some(route_handlers) => {
        handlers.extend_from_slice(route_handlers);
        Ok(Some(MatchedRoute { handlers }))
      }
      None => Ok(None),
    }
  }
}

impl std::fmt::Debug for SealedRouter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SealedRouter").finish_non_exhaustive()
  }
}

/// Validates a registration path: non-empty and starting with `/`.
fn validate_path(path: &str) -> Result<(), ArborError> {
  if path.is_empty() {
    return Err(ArborError::error(
      "route-empty",
      "route cannot be empty; it must be a valid path starting with /",
    ));
  }
  if !path.starts_with('/') {
    return Err(ArborError::error(
      "route-invalid",
      format!("route {path} must start with /"),
    ));
  }
  Ok(())
}

/// Walks (and creates) tree nodes for every segment of a registration path.
fn descend_registration<'a>(
  root: &'a mut RouteNode,
  path: &str,
) -> Result<&'a mut RouteNode, ArborError> {
  let mut node = root;
  for raw in path.split('/').filter(|s| !s.is_empty()) {
    let segment = Segment::parse(raw);
    node = node.descend_mut(&segment, path)?;
  }
  Ok(node)
}
