//! Path parameter extraction and deserialization for dynamic route segments.
//!
//! Dynamic segments like `/users/:id` bind their matched values as strings;
//! this extractor deserializes the bound map into a typed structure with
//! scalar coercion, so `:id` can land in a `u64` field directly.

use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::context::RequestContext;
use crate::extractors::FromContext;
use crate::types::ParamMap;

/// Path parameter extractor with automatic deserialization to typed
/// structures.
///
/// # Examples
///
/// ```rust
/// use arbor::context::RequestContext;
/// use arbor::extractors::FromContext;
/// use arbor::extractors::params::Params;
/// use arbor::Method;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct TrackParams {
///   id: String,
///   #[serde(rename = "trackId")]
///   track_id: u32,
/// }
///
/// let ctx = RequestContext::new(Method::GET, "/user/arpan404/track/123");
/// ctx.set_param("id", "arpan404");
/// ctx.set_param("trackId", "123");
///
/// let params = Params::<TrackParams>::from_context(&ctx).unwrap();
/// assert_eq!(params.0.id, "arpan404");
/// assert_eq!(params.0.track_id, 123);
/// ```
#[doc(alias = "params")]
#[derive(Debug)]
pub struct Params<T>(pub T);

/// Error produced when path parameters cannot be deserialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
  /// Parameter deserialization failed (type mismatch, missing field, etc.).
  DeserializationError(String),
}

impl std::fmt::Display for ParamsError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::DeserializationError(err) => {
        write!(f, "failed to deserialize path parameters: {err}")
      }
    }
  }
}

impl std::error::Error for ParamsError {}

impl<T> FromContext for Params<T>
where
  T: DeserializeOwned,
{
  type Error = ParamsError;

  fn from_context(ctx: &RequestContext) -> Result<Self, Self::Error> {
    let coerced = coerce_params(&ctx.params());
    let parsed = serde_json::from_value::<T>(Value::Object(coerced))
      .map_err(|e| ParamsError::DeserializationError(e.to_string()))?;
    Ok(Params(parsed))
  }
}

/// Converts string parameters into JSON-compatible values with type coercion.
fn coerce_params(map: &ParamMap) -> Map<String, Value> {
  let mut result = Map::new();

  for (k, v) in map {
    let val = if let Ok(n) = v.parse::<i64>() {
      Value::Number(n.into())
    } else if let Ok(n) = v.parse::<u64>() {
      Value::Number(n.into())
    } else if let Ok(n) = v.parse::<f64>() {
      Value::Number(serde_json::Number::from_f64(n).unwrap_or_else(|| 0.into()))
    } else {
      Value::String(v.clone())
    };

    result.insert(k.clone(), val);
  }

  result
}

#[cfg(test)]
mod tests {
  use http::Method;
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Deserialize, PartialEq)]
  struct UserParams {
    id: u64,
    name: String,
  }

  #[test]
  fn coerces_numeric_segments() {
    let ctx = RequestContext::new(Method::GET, "/users/7/profile/jo");
    ctx.set_param("id", "7");
    ctx.set_param("name", "jo");

    let params = Params::<UserParams>::from_context(&ctx).unwrap();
    assert_eq!(
      params.0,
      UserParams {
        id: 7,
        name: "jo".into()
      }
    );
  }

  #[test]
  fn missing_field_is_a_deserialization_error() {
    let ctx = RequestContext::new(Method::GET, "/users/7");
    ctx.set_param("id", "7");

    let err = Params::<UserParams>::from_context(&ctx).unwrap_err();
    matches!(err, ParamsError::DeserializationError(_));
  }
}
