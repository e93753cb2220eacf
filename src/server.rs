//! HTTP server implementation binding the dispatch core to hyper.
//!
//! This is the transport collaborator: it accepts connections, parses
//! requests with hyper, buffers the body, builds the per-request
//! [`RequestContext`], and writes out whatever the dispatcher produced. All
//! routing decisions live in [`SealedRouter::dispatch`]; nothing here
//! consults the route tree directly.

use std::convert::Infallible;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::context::RequestContext;
use crate::router::SealedRouter;
use crate::types::BoxError;

/// Starts the HTTP server with the given listener and sealed router.
///
/// This is the main entry point for serving an arbor application. The
/// router must already be sealed; all registration happens before traffic
/// is accepted.
///
/// # Examples
///
/// ```rust,no_run
/// use arbor::router::Router;
/// use arbor::server::serve;
/// use tokio::net::TcpListener;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let listener = TcpListener::bind("127.0.0.1:8080").await?;
/// let router = Router::new();
/// serve(listener, router.seal()).await;
/// # Ok(())
/// # }
/// ```
pub async fn serve(listener: TcpListener, router: SealedRouter) {
  run(listener, router).await.unwrap()
}

async fn run(listener: TcpListener, router: SealedRouter) -> Result<(), BoxError> {
  #[cfg(feature = "arbor-tracing")]
  crate::tracing::init_tracing();

  let addr = listener.local_addr()?;
  tracing::debug!("arbor listening on {addr}");

  loop {
    let (stream, _remote) = listener.accept().await?;
    let io = TokioIo::new(stream);
    let router = router.clone();

    tokio::spawn(async move {
      let svc = service_fn(move |req| {
        let router = router.clone();
        async move { Ok::<_, Infallible>(handle(router, req).await) }
      });

      let mut http = http1::Builder::new();
      http.keep_alive(true);

      if let Err(err) = http.serve_connection(io, svc).await {
        tracing::error!("error serving connection: {err}");
      }
    });
  }
}

/// Adapts one hyper request into a context, dispatches it, and converts the
/// prepared payload back into a hyper response.
async fn handle(
  router: SealedRouter,
  req: http::Request<hyper::body::Incoming>,
) -> http::Response<Full<Bytes>> {
  let (parts, body) = req.into_parts();

  let body = match body.collect().await {
    Ok(collected) => collected.to_bytes(),
    Err(err) => {
      tracing::error!("failed to read request body: {err}");
      let mut response = http::Response::new(Full::new(Bytes::new()));
      *response.status_mut() = StatusCode::BAD_REQUEST;
      return response;
    }
  };

  // Dispatch sees the full path-and-query; the matcher strips the query
  // string itself and records the pairs on the context.
  let path = parts
    .uri
    .path_and_query()
    .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());

  let ctx = RequestContext::from_parts(parts.method, path, parts.headers, body);
  router.dispatch(ctx).await.into_http_response()
}
