//! JSON request body extraction and deserialization for API endpoints.
//!
//! Validates the `Content-Type` header and deserializes the buffered request
//! body into a strongly-typed structure with serde.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::extractors::FromContext;

/// JSON request body extractor with automatic deserialization.
///
/// # Examples
///
/// ```rust
/// use arbor::context::RequestContext;
/// use arbor::extractors::FromContext;
/// use arbor::extractors::json::Json;
/// use arbor::{Bytes, Method};
/// use http::HeaderMap;
/// use http::header::CONTENT_TYPE;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateUser {
///   name: String,
///   email: String,
/// }
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
/// let ctx = RequestContext::from_parts(
///   Method::POST,
///   "/users",
///   headers,
///   Bytes::from(r#"{"name":"Jo","email":"jo@example.com"}"#),
/// );
///
/// let user = Json::<CreateUser>::from_context(&ctx).unwrap();
/// assert_eq!(user.0.name, "Jo");
/// ```
#[doc(alias = "json")]
#[derive(Debug)]
pub struct Json<T>(pub T);

/// Error types for JSON extraction and deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonError {
  /// Content-Type header is not application/json or a compatible JSON type.
  InvalidContentType,
  /// Content-Type header is missing from the request.
  MissingContentType,
  /// JSON deserialization failed (syntax error, type mismatch, etc.).
  DeserializationError(String),
}

impl std::fmt::Display for JsonError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InvalidContentType => {
        write!(f, "invalid content type; expected application/json")
      }
      Self::MissingContentType => write!(f, "missing content type header"),
      Self::DeserializationError(err) => write!(f, "failed to deserialize JSON: {err}"),
    }
  }
}

impl std::error::Error for JsonError {}

/// Checks if the Content-Type header indicates JSON content.
fn is_json_content_type(headers: &HeaderMap) -> bool {
  headers
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| {
      let essence = ct.split(';').next().unwrap_or_default().trim();
      essence == "application/json" || essence.ends_with("+json")
    })
}

impl<T> FromContext for Json<T>
where
  T: DeserializeOwned,
{
  type Error = JsonError;

  fn from_context(ctx: &RequestContext) -> Result<Self, Self::Error> {
    if ctx.headers().get(CONTENT_TYPE).is_none() {
      return Err(JsonError::MissingContentType);
    }
    if !is_json_content_type(ctx.headers()) {
      return Err(JsonError::InvalidContentType);
    }

    let parsed = serde_json::from_slice::<T>(ctx.body())
      .map_err(|e| JsonError::DeserializationError(e.to_string()))?;
    Ok(Json(parsed))
  }
}
