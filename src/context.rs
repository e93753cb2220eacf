//! Per-request context shared along the handler chain.
//!
//! A [`RequestContext`] is created by the transport glue for each inbound
//! request and carries the parsed method, raw path, headers, and buffered
//! body. The matcher writes dynamic path parameters and query-string pairs
//! into it before dispatch; handlers read them (or stash values of their own)
//! while the chain runs. Cloning is cheap — clones share the same underlying
//! request — but a context never crosses from one request to another.
//!
//! # Examples
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::Method;
//!
//! let ctx = RequestContext::new(Method::GET, "/user/42?expand=tracks");
//! assert_eq!(ctx.path(), "/user/42?expand=tracks");
//! assert_eq!(ctx.raw_query(), Some("expand=tracks"));
//!
//! ctx.set_param("id", "42");
//! assert_eq!(ctx.param("id").as_deref(), Some("42"));
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;
use http::Method;
use parking_lot::RwLock;

use crate::types::ParamMap;
use crate::types::QueryMap;

/// Shared, per-request state handed to every handler in a matched chain.
#[doc(alias = "context")]
#[derive(Clone)]
pub struct RequestContext {
  inner: Arc<ContextInner>,
}

struct ContextInner {
  method: Method,
  /// Raw request path as received, including query string and fragment.
  path: String,
  headers: HeaderMap,
  body: Bytes,
  params: RwLock<ParamMap>,
  query: RwLock<QueryMap>,
}

impl RequestContext {
  /// Creates a context with an empty header map and body.
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self::from_parts(method, path, HeaderMap::new(), Bytes::new())
  }

  /// Creates a context from fully parsed transport parts.
  pub fn from_parts(
    method: Method,
    path: impl Into<String>,
    headers: HeaderMap,
    body: Bytes,
  ) -> Self {
    Self {
      inner: Arc::new(ContextInner {
        method,
        path: path.into(),
        headers,
        body,
        params: RwLock::new(ParamMap::default()),
        query: RwLock::new(QueryMap::default()),
      }),
    }
  }

  /// Returns the request method.
  #[must_use]
  pub fn method(&self) -> &Method {
    &self.inner.method
  }

  /// Returns the raw request path, including any query string or fragment.
  #[must_use]
  pub fn path(&self) -> &str {
    &self.inner.path
  }

  /// Returns the request headers.
  #[must_use]
  pub fn headers(&self) -> &HeaderMap {
    &self.inner.headers
  }

  /// Returns the buffered request body.
  #[must_use]
  pub fn body(&self) -> &Bytes {
    &self.inner.body
  }

  /// Returns the raw query string, if the path carries one.
  ///
  /// The fragment is not part of the query: `/a?q=1#top` yields `q=1`.
  #[must_use]
  pub fn raw_query(&self) -> Option<&str> {
    let without_fragment = self.inner.path.split('#').next().unwrap_or_default();
    without_fragment.split_once('?').map(|(_, query)| query)
  }

  /// Returns the value bound to a dynamic path parameter during matching.
  #[must_use]
  pub fn param(&self, name: &str) -> Option<String> {
    self.inner.params.read().get(name).cloned()
  }

  /// Returns a snapshot of all bound path parameters.
  #[must_use]
  pub fn params(&self) -> ParamMap {
    self.inner.params.read().clone()
  }

  /// Binds a dynamic path parameter. Called by the matcher during the walk.
  pub fn set_param(&self, name: impl Into<String>, value: impl Into<String>) {
    self.inner.params.write().insert(name.into(), value.into());
  }

  /// Returns the raw value of a query-string key.
  #[must_use]
  pub fn query(&self, key: &str) -> Option<String> {
    self.inner.query.read().get(key).cloned()
  }

  /// Returns a snapshot of all query-string pairs.
  #[must_use]
  pub fn query_map(&self) -> QueryMap {
    self.inner.query.read().clone()
  }

  /// Records a query-string pair. Called by the matcher before the walk.
  pub fn set_query(&self, key: impl Into<String>, value: impl Into<String>) {
    self.inner.query.write().insert(key.into(), value.into());
  }
}

impl std::fmt::Debug for RequestContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RequestContext")
      .field("method", &self.inner.method)
      .field("path", &self.inner.path)
      .finish_non_exhaustive()
  }
}
