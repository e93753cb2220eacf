//! Query parameter extraction and deserialization from URL query strings.
//!
//! The matcher records query pairs raw (split on `&` then `=`, no decoding);
//! this extractor instead parses the original query string with
//! percent-decoding and deserializes it into a typed structure.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::context::RequestContext;
use crate::extractors::FromContext;
use crate::types::BuildHasher;

/// Query parameter extractor with automatic deserialization to typed
/// structures.
///
/// # Examples
///
/// ```rust
/// use arbor::context::RequestContext;
/// use arbor::extractors::FromContext;
/// use arbor::extractors::query::Query;
/// use arbor::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct SearchQuery {
///   q: String,
///   page: Option<String>,
/// }
///
/// let ctx = RequestContext::new(Method::GET, "/search?q=route%20trees&page=2");
/// let query = Query::<SearchQuery>::from_context(&ctx).unwrap();
/// assert_eq!(query.0.q, "route trees");
/// assert_eq!(query.0.page.as_deref(), Some("2"));
/// ```
#[doc(alias = "query")]
#[derive(Debug)]
pub struct Query<T>(pub T);

/// Error types for query parameter extraction and deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
  /// Failed to parse query parameters from the query string.
  ParseError(String),
  /// Query parameter deserialization failed (type mismatch, missing field,
  /// etc.).
  DeserializationError(String),
}

impl std::fmt::Display for QueryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ParseError(err) => write!(f, "failed to parse query parameters: {err}"),
      Self::DeserializationError(err) => {
        write!(f, "failed to deserialize query parameters: {err}")
      }
    }
  }
}

impl std::error::Error for QueryError {}

impl<T> FromContext for Query<T>
where
  T: DeserializeOwned,
{
  type Error = QueryError;

  fn from_context(ctx: &RequestContext) -> Result<Self, Self::Error> {
    let query = ctx.raw_query().unwrap_or_default();

    let params: HashMap<String, String, BuildHasher> = form_urlencoded::parse(query.as_bytes())
      .into_owned()
      .collect();

    let json_value =
      serde_json::to_value(params).map_err(|e| QueryError::ParseError(e.to_string()))?;

    let query_data = serde_json::from_value::<T>(json_value)
      .map_err(|e| QueryError::DeserializationError(e.to_string()))?;

    Ok(Query(query_data))
  }
}

#[cfg(test)]
mod tests {
  use http::Method;
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Deserialize)]
  struct Pagination {
    page: String,
    per_page: Option<String>,
  }

  #[test]
  fn extracts_and_decodes_pairs() {
    let ctx = RequestContext::new(Method::GET, "/items?page=3&per_page=20");
    let query = Query::<Pagination>::from_context(&ctx).unwrap();
    assert_eq!(query.0.page, "3");
    assert_eq!(query.0.per_page.as_deref(), Some("20"));
  }

  #[test]
  fn missing_required_key_fails() {
    let ctx = RequestContext::new(Method::GET, "/items");
    let err = Query::<Pagination>::from_context(&ctx).unwrap_err();
    matches!(err, QueryError::DeserializationError(_));
  }
}
