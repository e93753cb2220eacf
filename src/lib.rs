#![cfg_attr(docsrs, feature(doc_cfg))]

//! A lightweight HTTP routing and dispatch core for async applications.
//!
//! Arbor is built around one data structure: an explicit route tree mapping
//! path segments to nodes that carry per-method handler chains and two
//! middleware scopes. Registration happens in a single-threaded builder
//! phase on a [`router::Router`]; sealing the router produces an immutable
//! [`router::SealedRouter`] that is shared, lock-free, across concurrently
//! handled requests.
//!
//! # High-level features
//! - Macro-free routing with `:name` dynamic path parameters, static-over-
//!   dynamic precedence, and sibling dynamic-conflict detection
//! - Local middleware (runs only on its exact route) and global middleware
//!   (attached with a trailing `*`, inherited by the whole subtree)
//! - Flat handler chains: each handler either responds — stopping the chain
//!   — or falls through to the next one
//! - A fluent, validated [`response::ResponseBuilder`] normalized into a
//!   wire-ready payload (status, headers, body, `Set-Cookie` strings)
//! - Typed [`extractors`] for path parameters and query strings
//! - Structured, severity-tagged error reporting that fails closed: every
//!   request gets an answer, and internal errors never leak into bodies
//!
//! # Compatibility
//! - Runtime: `tokio`
//! - HTTP: `hyper` 1.x
//!
//! # Quickstart
//!
//! ```rust
//! use arbor::context::RequestContext;
//! use arbor::handler::HandlerResult;
//! use arbor::response::ResponseBuilder;
//! use arbor::router::Router;
//!
//! async fn hello(_ctx: RequestContext) -> HandlerResult {
//!   Ok(Some(ResponseBuilder::new().set_data("Hello, World!")))
//! }
//!
//! let mut router = Router::new();
//! router.get("/", hello);
//! let sealed = router.seal();
//! ```
//!
//! # Key concepts
//! - [router::Router] registers routes and middleware, then seals into the
//!   read-only matcher.
//! - [context::RequestContext] carries the request plus the params and query
//!   maps the matcher fills in.
//! - [response::ResponseBuilder] accumulates the response; finalization and
//!   preparation turn it into bytes for the transport.
//! - [handler] defines the single always-awaitable handler shape.
//!
//! # Feature flags
//! - `arbor-tracing` — structured tracing subscriber initialization

/// Per-request context shared along the handler chain.
pub mod context;

/// Request dispatch and short-circuiting rules.
mod dispatch;

/// Structured error reporting with stable codes and severities.
pub mod error;

/// Typed extraction of request data from the context.
pub mod extractors;

/// Request handler traits and implementations.
pub mod handler;

/// Redirection utilities for handling HTTP redirects.
pub mod redirect;

/// Response construction, finalization, and preparation.
pub mod response;

/// Route registration, middleware attachment, and matching.
pub mod router;

/// HTTP server implementation binding the core to hyper.
pub mod server;

/// Distributed tracing integration for observability.
#[cfg(feature = "arbor-tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "arbor-tracing")))]
pub mod tracing;

/// Route tree nodes and segment classification.
mod tree;

/// Core type definitions used throughout the framework.
pub mod types;

pub use bytes::Bytes;
pub use http::Method;
pub use http::StatusCode;
pub use http::header;
pub use server::serve;
