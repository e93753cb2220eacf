//! Typed extraction of request data from the per-request context.
//!
//! Extractors turn the raw string maps the matcher writes into the context —
//! dynamic path parameters and query pairs — into strongly-typed values via
//! serde. Handlers call them explicitly:
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::extractors::FromContext;
//! use arbor::extractors::params::Params;
//! use arbor::Method;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct UserParams {
//!   id: u64,
//! }
//!
//! let ctx = RequestContext::new(Method::GET, "/user/42");
//! ctx.set_param("id", "42");
//!
//! let params = Params::<UserParams>::from_context(&ctx).unwrap();
//! assert_eq!(params.0.id, 42);
//! ```

pub mod json;
pub mod params;
pub mod query;

use crate::context::RequestContext;

/// Types that can be constructed from the request context.
pub trait FromContext: Sized {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Extracts the value from the context.
  fn from_context(ctx: &RequestContext) -> Result<Self, Self::Error>;
}
