//! Core type definitions used throughout the framework.

use std::collections::HashMap;

/// Boxed error type used at trait-object boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crate-wide hasher for string-keyed maps.
pub type BuildHasher = ahash::RandomState;

/// Mapping of dynamic path parameter names to the values bound during a match.
pub type ParamMap = HashMap<String, String, BuildHasher>;

/// Mapping of query-string keys to raw (undecoded) values.
pub type QueryMap = HashMap<String, String, BuildHasher>;

/// Mapping of header names to values as accumulated by the response builder.
///
/// Converted to a typed [`http::HeaderMap`] during response preparation.
pub type HeaderPairs = HashMap<String, String, BuildHasher>;
