//! Response construction: a fluent, validated accumulator for status,
//! message, data, errors, headers, and cookies.
//!
//! Handlers build a [`ResponseBuilder`] and return it to stop the chain. The
//! builder is finalized exactly once into a [`FinalizedResponse`] — the
//! normalized form with defaults resolved — which response preparation (see
//! [`prepare`](crate::response::prepare)) turns into a wire-ready payload.
//!
//! Data and error are mutually exclusive: setting one while the other is
//! already set logs a warning and the later call wins. Transfer-mode
//! selectors ([`ResponseBuilder::send_as_stream`] and friends) record intent
//! only; actual file or stream I/O belongs to the serving collaborator.
//!
//! # Examples
//!
//! ```rust
//! use arbor::response::ResponseBuilder;
//! use serde_json::json;
//!
//! let response = ResponseBuilder::new()
//!   .set_status(200)
//!   .set_message("OK")
//!   .set_data(json!({ "user": "John Doe" }));
//!
//! let finalized = response.finalize();
//! assert_eq!(finalized.status.as_u16(), 200);
//! ```

pub mod prepare;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::error::ArborError;
use crate::types::BuildHasher;
use crate::types::HeaderPairs;

/// What kind of payload the builder carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
  /// Plain data; objects are JSON-encoded at preparation time.
  Normal,
  /// Data explicitly tagged as JSON.
  Json,
  /// Error mode; the payload is always wrapped as `{ message, data }`.
  Error,
}

/// How the payload should be transferred to the client.
///
/// Recorded intent only — the routing core performs no I/O. The serving
/// collaborator inspects this to stream or send files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMode {
  /// The body is buffered in memory and written as-is.
  Buffered,
  /// The body should be streamed in chunks.
  Stream,
  /// The file at the given path should be served inline.
  File(PathBuf),
  /// The file at the given path should be served as an attachment.
  Download(PathBuf),
}

/// `SameSite` cookie attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
  Strict,
  Lax,
  None,
}

impl SameSite {
  fn as_str(self) -> &'static str {
    match self {
      Self::Strict => "Strict",
      Self::Lax => "Lax",
      Self::None => "None",
    }
  }
}

/// Optional attributes serialized after a cookie's `name=value` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
  pub domain: Option<String>,
  pub path: Option<String>,
  /// Serialized as an HTTP-date string.
  pub expires: Option<SystemTime>,
  pub max_age: Option<i64>,
  pub http_only: bool,
  pub secure: bool,
  pub same_site: Option<SameSite>,
}

/// A single response cookie: a value plus optional attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
  pub value: String,
  pub options: Option<CookieOptions>,
}

impl Cookie {
  /// Creates a cookie with no attributes.
  pub fn new(value: impl Into<String>) -> Self {
    Self {
      value: value.into(),
      options: None,
    }
  }

  /// Creates a cookie with attributes.
  pub fn with_options(value: impl Into<String>, options: CookieOptions) -> Self {
    Self {
      value: value.into(),
      options: Some(options),
    }
  }

  /// Serializes the cookie into its `Set-Cookie` string form.
  pub(crate) fn serialize(&self, name: &str) -> String {
    let mut out = format!("{name}={}", self.value);

    if let Some(options) = &self.options {
      if let Some(domain) = &options.domain {
        out.push_str("; Domain=");
        out.push_str(domain);
      }
      if let Some(path) = &options.path {
        out.push_str("; Path=");
        out.push_str(path);
      }
      if let Some(expires) = options.expires {
        out.push_str("; Expires=");
        out.push_str(&httpdate::fmt_http_date(expires));
      }
      if let Some(max_age) = options.max_age {
        out.push_str("; Max-Age=");
        out.push_str(&max_age.to_string());
      }
      if options.http_only {
        out.push_str("; HttpOnly");
      }
      if options.secure {
        out.push_str("; Secure");
      }
      if let Some(same_site) = options.same_site {
        out.push_str("; SameSite=");
        out.push_str(same_site.as_str());
      }
    }

    out
  }
}

/// Mapping of cookie names to cookies as accumulated by the builder.
pub type CookieJar = HashMap<String, Cookie, BuildHasher>;

/// Fluent accumulator for one response.
///
/// Created fresh by a handler, consumed once by [`ResponseBuilder::finalize`],
/// then discarded. Every setter consumes and returns the builder so calls
/// chain; setters never panic — invalid input is reported through the error
/// channel and the builder is left unchanged.
#[doc(alias = "response")]
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
  status: Option<StatusCode>,
  message: Option<String>,
  data: Option<Value>,
  error: Option<Value>,
  headers: HeaderPairs,
  cookies: CookieJar,
  payload: Option<PayloadKind>,
  transfer: Option<TransferMode>,
}

impl ResponseBuilder {
  /// Creates an empty builder.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the HTTP status code.
  ///
  /// Values outside the valid status range are reported and ignored.
  #[must_use]
  pub fn set_status(mut self, status: u16) -> Self {
    match StatusCode::from_u16(status) {
      Ok(code) => self.status = Some(code),
      Err(_) => {
        ArborError::error(
          "response-status-invalid",
          format!("{status} is not a valid HTTP status code"),
        )
        .report();
      }
    }
    self
  }

  /// Sets the response message. Overwriting an existing message logs a
  /// warning and keeps the newer value.
  #[must_use]
  pub fn set_message(mut self, message: impl Into<String>) -> Self {
    let message = message.into();
    if let Some(previous) = &self.message {
      tracing::warn!(
        "message is already set to {previous:?}; overwriting with {message:?}"
      );
    }
    self.message = Some(message);
    self
  }

  /// Sets the response data.
  ///
  /// Data and error are mutually exclusive: if an error was already set, a
  /// warning is logged, the error is discarded, and this call wins.
  #[must_use]
  pub fn set_data<T: Serialize>(self, data: T) -> Self {
    self.set_data_with_kind(data, PayloadKind::Normal)
  }

  /// Sets the response data, tagging it as JSON.
  ///
  /// The value must serialize to a JSON object or array; anything else is
  /// reported and ignored.
  #[must_use]
  pub fn set_data_as_json<T: Serialize>(self, data: T) -> Self {
    match serde_json::to_value(&data) {
      Ok(value) if value.is_object() || value.is_array() => {
        self.set_data_with_kind(value, PayloadKind::Json)
      }
      Ok(value) => {
        ArborError::error(
          "response-json-invalid",
          format!("JSON data must be an object or array, but got {value}"),
        )
        .report();
        self
      }
      Err(err) => {
        ArborError::error(
          "response-json-invalid",
          format!("JSON data could not be serialized: {err}"),
        )
        .report();
        self
      }
    }
  }

  fn set_data_with_kind<T: Serialize>(mut self, data: T, kind: PayloadKind) -> Self {
    let value = match serde_json::to_value(&data) {
      Ok(value) => value,
      Err(err) => {
        ArborError::error(
          "response-data-invalid",
          format!("data could not be serialized: {err}"),
        )
        .report();
        return self;
      }
    };

    if self.error.is_some() {
      ArborError::warn(
        "response-error-already-set",
        "error has already been set; data and error are mutually exclusive, \
         the data set last wins",
      )
      .report();
      self.error = None;
    } else if self.data.is_some() {
      ArborError::warn(
        "response-data-already-set",
        "data has already been set; the value set last wins",
      )
      .report();
    }

    self.data = Some(value);
    self.payload = Some(kind);
    self
  }

  /// Sets the error payload and switches the response into error mode.
  ///
  /// Mutually exclusive with data: if data was already set, a warning is
  /// logged, the data is discarded, and this call wins.
  #[must_use]
  pub fn set_error<T: Serialize>(mut self, error: T) -> Self {
    let value = match serde_json::to_value(&error) {
      Ok(value) => value,
      Err(err) => {
        ArborError::error(
          "response-error-invalid",
          format!("error could not be serialized: {err}"),
        )
        .report();
        return self;
      }
    };

    if self.data.is_some() {
      ArborError::warn(
        "response-data-already-set",
        "data has already been set; data and error are mutually exclusive, \
         the error set last wins",
      )
      .report();
      self.data = None;
    } else if self.error.is_some() {
      ArborError::warn(
        "response-error-already-set",
        "error has already been set; the value set last wins",
      )
      .report();
    }

    self.error = Some(value);
    self.payload = Some(PayloadKind::Error);
    self
  }

  /// Merges headers into the response, keeping existing entries unless the
  /// incoming map carries the same key.
  #[must_use]
  pub fn set_headers(mut self, headers: HeaderPairs) -> Self {
    self.headers.extend(headers);
    self
  }

  /// Replaces all accumulated headers with the given map.
  #[must_use]
  pub fn replace_headers(mut self, headers: HeaderPairs) -> Self {
    self.headers = headers;
    self
  }

  /// Sets a single header.
  #[must_use]
  pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.insert(name.into(), value.into());
    self
  }

  /// Merges cookies into the response. The mapping must be non-empty;
  /// an empty one is reported and ignored.
  #[must_use]
  pub fn set_cookies(mut self, cookies: CookieJar) -> Self {
    if cookies.is_empty() {
      ArborError::error("response-cookies-empty", "cookies must be a non-empty mapping").report();
      return self;
    }
    self.cookies.extend(cookies);
    self
  }

  /// Sets a single cookie.
  #[must_use]
  pub fn set_cookie(mut self, name: impl Into<String>, cookie: Cookie) -> Self {
    self.cookies.insert(name.into(), cookie);
    self
  }

  /// Marks the response to be streamed. Intent only; no I/O happens here.
  #[must_use]
  pub fn send_as_stream(mut self) -> Self {
    self.transfer = Some(TransferMode::Stream);
    self
  }

  /// Marks the response as a file to serve inline from the given path.
  #[must_use]
  pub fn send_as_file(mut self, path: impl Into<PathBuf>) -> Self {
    self.transfer = Some(TransferMode::File(path.into()));
    self
  }

  /// Marks the response as a file to serve as a download attachment.
  #[must_use]
  pub fn send_as_download(mut self, path: impl Into<PathBuf>) -> Self {
    self.transfer = Some(TransferMode::Download(path.into()));
    self
  }

  /// Finalizes the builder into its normalized form.
  ///
  /// Resolution rules: the status is the explicit value, or `500` when an
  /// error was set, or `200` otherwise. The message is the explicit value,
  /// or the status's canonical reason phrase, or a generic default. In error
  /// mode the payload is the error value; otherwise the data value, which
  /// may be absent.
  #[must_use]
  pub fn finalize(self) -> FinalizedResponse {
    let payload = self.payload.unwrap_or(PayloadKind::Normal);
    let error_mode = payload == PayloadKind::Error;

    let status = self.status.unwrap_or(if error_mode {
      StatusCode::INTERNAL_SERVER_ERROR
    } else {
      StatusCode::OK
    });

    let message = self
      .message
      .or_else(|| status.canonical_reason().map(str::to_owned))
      .unwrap_or_else(|| {
        if error_mode {
          "Internal Server Error".to_owned()
        } else {
          "OK".to_owned()
        }
      });

    let data = if error_mode { self.error } else { self.data };

    FinalizedResponse {
      status,
      message,
      data,
      headers: self.headers,
      cookies: self.cookies,
      payload,
      transfer: self.transfer.unwrap_or(TransferMode::Buffered),
    }
  }
}

/// Normalized response with all defaults resolved.
///
/// Produced by [`ResponseBuilder::finalize`] and consumed by
/// [`FinalizedResponse::prepare`](crate::response::prepare).
#[derive(Debug, Clone)]
pub struct FinalizedResponse {
  pub status: StatusCode,
  pub message: String,
  pub data: Option<Value>,
  pub headers: HeaderPairs,
  pub cookies: CookieJar,
  pub payload: PayloadKind,
  pub transfer: TransferMode,
}
