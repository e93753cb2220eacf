//! Response preparation: turning a finalized response into a transport
//! payload.
//!
//! Preparation derives the wire form: structured bodies are JSON-encoded and
//! `Content-Type: application/json` is set, error-mode responses are always
//! wrapped as `{ "message": ..., "data": ... }`, cookies become literal
//! `Set-Cookie` strings, and any headers set explicitly on the builder are
//! merged last so they win over derived ones.
//!
//! # Examples
//!
//! ```rust
//! use arbor::response::ResponseBuilder;
//! use serde_json::json;
//!
//! let prepared = ResponseBuilder::new()
//!   .set_data(json!({ "id": "arpan404" }))
//!   .finalize()
//!   .prepare();
//!
//! assert_eq!(prepared.status.as_u16(), 200);
//! assert_eq!(
//!   prepared.headers.get("content-type").unwrap(),
//!   "application/json"
//! );
//! ```

use bytes::Bytes;
use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use http::header::SET_COOKIE;
use http_body_util::Full;
use serde_json::Value;
use serde_json::json;

use crate::error::ArborError;
use crate::response::FinalizedResponse;
use crate::response::PayloadKind;
use crate::response::TransferMode;

/// Wire-ready response payload handed to the transport layer.
#[derive(Debug)]
pub struct PreparedResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  /// Serialized `Set-Cookie` strings, one per cookie.
  pub cookies: Vec<String>,
  pub body: Bytes,
  /// Transfer intent for the serving collaborator; [`TransferMode::Buffered`]
  /// means `body` is the complete payload.
  pub transfer: TransferMode,
}

impl FinalizedResponse {
  /// Prepares the finalized response for the transport layer.
  #[must_use]
  pub fn prepare(self) -> PreparedResponse {
    let mut headers = HeaderMap::new();
    let body = match self.payload {
      PayloadKind::Error => {
        // Error responses always carry the `{ message, data }` JSON wrapper,
        // whatever shape the error value has.
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let wrapped = json!({
          "message": self.message,
          "data": self.data.unwrap_or(Value::Null),
        });
        Bytes::from(encode_json(&wrapped))
      }
      PayloadKind::Normal | PayloadKind::Json => match self.data {
        None => Bytes::new(),
        Some(Value::String(text)) => Bytes::from(text),
        Some(Value::Number(n)) => Bytes::from(n.to_string()),
        Some(Value::Bool(b)) => Bytes::from(b.to_string()),
        Some(structured) => {
          headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
          Bytes::from(encode_json(&structured))
        }
      },
    };

    // Explicitly set headers are merged last so they win over derived ones.
    for (name, value) in &self.headers {
      match (
        HeaderName::try_from(name.as_str()),
        HeaderValue::try_from(value.as_str()),
      ) {
        (Ok(name), Ok(value)) => {
          headers.insert(name, value);
        }
        _ => {
          ArborError::warn(
            "response-header-invalid",
            format!("header {name}: {value} is not a valid HTTP header and was dropped"),
          )
          .report();
        }
      }
    }

    let mut cookies: Vec<String> = self
      .cookies
      .iter()
      .map(|(name, cookie)| cookie.serialize(name))
      .collect();
    cookies.sort();

    PreparedResponse {
      status: self.status,
      headers,
      cookies,
      body,
      transfer: self.transfer,
    }
  }
}

impl PreparedResponse {
  /// Converts the prepared payload into an `http` response for hyper.
  ///
  /// `Set-Cookie` strings become one header each; a cookie that does not
  /// form a valid header value is dropped with a warning rather than
  /// aborting the response.
  #[must_use]
  pub fn into_http_response(self) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(self.body));
    *response.status_mut() = self.status;
    *response.headers_mut() = self.headers;

    for cookie in self.cookies {
      match HeaderValue::try_from(cookie.as_str()) {
        Ok(value) => {
          response.headers_mut().append(SET_COOKIE, value);
        }
        Err(_) => {
          ArborError::warn(
            "response-cookie-invalid",
            format!("cookie {cookie} is not a valid header value and was dropped"),
          )
          .report();
        }
      }
    }

    response
  }
}

fn encode_json(value: &Value) -> String {
  serde_json::to_string(value).unwrap_or_else(|err| {
    ArborError::error(
      "response-encode-failed",
      format!("response body could not be encoded: {err}"),
    )
    .report();
    String::new()
  })
}

#[cfg(test)]
mod tests {
  use std::time::Duration;
  use std::time::SystemTime;

  use serde_json::json;

  use super::*;
  use crate::response::Cookie;
  use crate::response::CookieJar;
  use crate::response::CookieOptions;
  use crate::response::ResponseBuilder;

  #[test]
  fn object_bodies_are_json_encoded() {
    let prepared = ResponseBuilder::new()
      .set_data(json!({ "id": "arpan404", "trackId": "123" }))
      .finalize()
      .prepare();

    assert_eq!(prepared.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let decoded: Value = serde_json::from_slice(&prepared.body).unwrap();
    assert_eq!(decoded, json!({ "id": "arpan404", "trackId": "123" }));
  }

  #[test]
  fn string_bodies_pass_through_untyped() {
    let prepared = ResponseBuilder::new()
      .set_data("plain text")
      .finalize()
      .prepare();

    assert!(prepared.headers.get(CONTENT_TYPE).is_none());
    assert_eq!(&prepared.body[..], b"plain text");
  }

  #[test]
  fn error_mode_always_wraps_message_and_data() {
    let prepared = ResponseBuilder::new()
      .set_error("database unreachable")
      .finalize()
      .prepare();

    assert_eq!(prepared.status, StatusCode::INTERNAL_SERVER_ERROR);
    let decoded: Value = serde_json::from_slice(&prepared.body).unwrap();
    assert_eq!(
      decoded,
      json!({ "message": "Internal Server Error", "data": "database unreachable" })
    );
  }

  #[test]
  fn explicit_headers_win_over_derived_ones() {
    let prepared = ResponseBuilder::new()
      .set_data(json!({ "a": 1 }))
      .set_header("Content-Type", "application/vnd.api+json")
      .finalize()
      .prepare();

    assert_eq!(
      prepared.headers.get(CONTENT_TYPE).unwrap(),
      "application/vnd.api+json"
    );
  }

  #[test]
  fn cookies_serialize_with_http_date_expiry() {
    let expiry = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
    let mut jar = CookieJar::default();
    jar.insert(
      "session".into(),
      Cookie::with_options(
        "abc",
        CookieOptions {
          expires: Some(expiry),
          http_only: true,
          ..CookieOptions::default()
        },
      ),
    );

    let prepared = ResponseBuilder::new().set_cookies(jar).finalize().prepare();
    assert_eq!(
      prepared.cookies,
      vec!["session=abc; Expires=Sun, 09 Sep 2001 01:46:40 GMT; HttpOnly".to_string()]
    );
  }

  #[test]
  fn http_conversion_appends_set_cookie_headers() {
    let mut jar = CookieJar::default();
    jar.insert("a".into(), Cookie::new("1"));
    jar.insert("b".into(), Cookie::new("2"));

    let response = ResponseBuilder::new()
      .set_status(201)
      .set_cookies(jar)
      .finalize()
      .prepare()
      .into_http_response();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(cookies.len(), 2);
  }

  #[test]
  fn empty_body_for_no_data() {
    let prepared = ResponseBuilder::new().finalize().prepare();
    assert!(prepared.body.is_empty());
    assert_eq!(prepared.status, StatusCode::OK);
  }
}
