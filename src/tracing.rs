//! Structured tracing subscriber initialization.
//!
//! Behind the `arbor-tracing` feature. The core always emits through the
//! `tracing` macros; this module only wires up a default formatting
//! subscriber with `RUST_LOG`-style filtering for applications that have not
//! installed their own.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber with env-filter support.
///
/// Falls back to the `info` level when `RUST_LOG` is unset. Does nothing if
/// a global subscriber is already installed.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
