//! Redirect response utilities for handlers.
//!
//! Small constructors that produce a [`ResponseBuilder`] with the right
//! status code and `Location` header, so a handler can return a redirect in
//! one line.
//!
//! # Examples
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::handler::HandlerResult;
//! use arbor::redirect;
//!
//! async fn go_home(_ctx: RequestContext) -> HandlerResult {
//!   Ok(Some(redirect::temporary("/")))
//! }
//! ```

use http::StatusCode;
use http::header::LOCATION;

use crate::response::ResponseBuilder;

/// Builds a redirect response with a custom status code.
#[must_use]
pub fn with_status(location: impl Into<String>, status: StatusCode) -> ResponseBuilder {
  ResponseBuilder::new()
    .set_status(status.as_u16())
    .set_header(LOCATION.as_str(), location)
}

/// 302 Found (common temporary redirect).
#[must_use]
pub fn found(location: impl Into<String>) -> ResponseBuilder {
  with_status(location, StatusCode::FOUND)
}

/// 303 See Other (commonly used after POST to redirect to a GET page).
#[must_use]
pub fn see_other(location: impl Into<String>) -> ResponseBuilder {
  with_status(location, StatusCode::SEE_OTHER)
}

/// 307 Temporary Redirect (preserves the HTTP method).
#[must_use]
pub fn temporary(location: impl Into<String>) -> ResponseBuilder {
  with_status(location, StatusCode::TEMPORARY_REDIRECT)
}

/// 301 Moved Permanently.
#[must_use]
pub fn moved_permanently(location: impl Into<String>) -> ResponseBuilder {
  with_status(location, StatusCode::MOVED_PERMANENTLY)
}

/// 308 Permanent Redirect.
#[must_use]
pub fn permanent(location: impl Into<String>) -> ResponseBuilder {
  with_status(location, StatusCode::PERMANENT_REDIRECT)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sets_status_and_location() {
    let prepared = temporary("/login").finalize().prepare();
    assert_eq!(prepared.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(prepared.headers.get(LOCATION).unwrap(), "/login");
  }

  #[test]
  fn permanent_variants() {
    let prepared = moved_permanently("/new").finalize().prepare();
    assert_eq!(prepared.status, StatusCode::MOVED_PERMANENTLY);

    let prepared = permanent("/new").finalize().prepare();
    assert_eq!(prepared.status, StatusCode::PERMANENT_REDIRECT);
  }
}
