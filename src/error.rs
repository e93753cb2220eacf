//! Structured error reporting for registration, matching, and dispatch.
//!
//! Every failure the routing core can produce is an [`ArborError`]: a stable
//! string code, a human-readable message, and a [`Severity`] that decides how
//! the error is surfaced. Registration-time problems are reported through
//! [`ArborError::report`] and the offending operation is skipped; they never
//! crash the process. Dispatch-time failures are caught at the dispatcher
//! boundary and translated into `500` responses.
//!
//! # Examples
//!
//! ```rust
//! use arbor::error::{ArborError, Severity};
//!
//! let err = ArborError::new(
//!   "route-conflict",
//!   "route /user/:name conflicts with existing route /user/:id",
//!   Severity::Error,
//! );
//! assert_eq!(err.code(), "route-conflict");
//! err.report();
//! ```

/// How an [`ArborError`] is surfaced when reported.
///
/// `Warn` is logged and ignored. `Error` is logged and the specific operation
/// is skipped. `Panic` logs and terminates the process; it is reserved for
/// unrecoverable startup failures and is not produced by the routing core
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Warn,
  Error,
  Panic,
}

/// Structured error with a stable code and severity.
///
/// The code is a short kebab-case identifier (`route-conflict`,
/// `path-empty`, ...) that stays stable across releases so callers and tests
/// can match on it without parsing messages.
#[doc(alias = "error")]
#[derive(Debug, Clone)]
pub struct ArborError {
  code: &'static str,
  message: String,
  severity: Severity,
}

impl ArborError {
  /// Creates a new error with the given code, message, and severity.
  pub fn new(code: &'static str, message: impl Into<String>, severity: Severity) -> Self {
    Self {
      code,
      message: message.into(),
      severity,
    }
  }

  /// Creates a `Warn`-severity error.
  pub fn warn(code: &'static str, message: impl Into<String>) -> Self {
    Self::new(code, message, Severity::Warn)
  }

  /// Creates an `Error`-severity error.
  pub fn error(code: &'static str, message: impl Into<String>) -> Self {
    Self::new(code, message, Severity::Error)
  }

  /// Returns the stable error code.
  #[must_use]
  pub fn code(&self) -> &'static str {
    self.code
  }

  /// Returns the error severity.
  #[must_use]
  pub fn severity(&self) -> Severity {
    self.severity
  }

  /// Returns the human-readable message.
  #[must_use]
  pub fn message(&self) -> &str {
    &self.message
  }

  /// Logs the error according to its severity.
  ///
  /// `Warn` and `Error` log and return. `Panic` logs and terminates the
  /// process with a non-zero exit code.
  pub fn report(&self) {
    match self.severity {
      Severity::Warn => {
        tracing::warn!(code = self.code, "{}", self.message);
      }
      Severity::Error => {
        tracing::error!(code = self.code, "{}", self.message);
      }
      Severity::Panic => {
        tracing::error!(code = self.code, "{}", self.message);
        std::process::exit(1);
      }
    }
  }
}

impl std::fmt::Display for ArborError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.code, self.message)
  }
}

impl std::error::Error for ArborError {}
