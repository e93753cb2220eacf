//! End-to-end routing and dispatch behavior through the public API.

use std::sync::Arc;

use arbor::Method;
use arbor::StatusCode;
use arbor::context::RequestContext;
use arbor::handler::BoxHandler;
use arbor::response::ResponseBuilder;
use arbor::router::Router;
use parking_lot::Mutex;
use serde_json::Value;
use serde_json::json;

type Journal = Arc<Mutex<Vec<&'static str>>>;

fn journaling(journal: &Journal, name: &'static str) -> BoxHandler {
  let journal = journal.clone();
  BoxHandler::new(move |_ctx: RequestContext| {
    let journal = journal.clone();
    async move {
      journal.lock().push(name);
      Ok(None)
    }
  })
}

fn responding(journal: &Journal, name: &'static str) -> BoxHandler {
  let journal = journal.clone();
  BoxHandler::new(move |_ctx: RequestContext| {
    let journal = journal.clone();
    async move {
      journal.lock().push(name);
      Ok(Some(ResponseBuilder::new().set_status(200)))
    }
  })
}

#[tokio::test]
async fn user_track_scenario_binds_both_params() {
  let mut router = Router::new();
  router.get("/user/:id/track/:trackId", |ctx: RequestContext| async move {
    Ok(Some(ResponseBuilder::new().set_status(200).set_data(json!({
      "id": ctx.param("id"),
      "trackId": ctx.param("trackId"),
    }))))
  });
  let sealed = router.seal();

  let ctx = RequestContext::new(Method::GET, "/user/arpan404/track/123");
  let prepared = sealed.dispatch(ctx.clone()).await;

  assert_eq!(prepared.status, StatusCode::OK);
  assert_eq!(ctx.param("id").as_deref(), Some("arpan404"));
  assert_eq!(ctx.param("trackId").as_deref(), Some("123"));

  let body: Value = serde_json::from_slice(&prepared.body).unwrap();
  assert_eq!(body, json!({ "id": "arpan404", "trackId": "123" }));
}

#[tokio::test]
async fn static_route_beats_dynamic_sibling() {
  let mut router = Router::new();
  router.get("/user/list", |_ctx: RequestContext| async {
    Ok(Some(ResponseBuilder::new().set_data("static")))
  });
  router.get("/user/:id", |ctx: RequestContext| async move {
    Ok(Some(ResponseBuilder::new().set_data(ctx.param("id"))))
  });
  let sealed = router.seal();

  let ctx = RequestContext::new(Method::GET, "/user/list");
  let prepared = sealed.dispatch(ctx).await;
  assert_eq!(&prepared.body[..], b"static");

  let ctx = RequestContext::new(Method::GET, "/user/42");
  let prepared = sealed.dispatch(ctx.clone()).await;
  assert_eq!(ctx.param("id").as_deref(), Some("42"));
  assert_eq!(&prepared.body[..], b"42");
}

#[tokio::test]
async fn global_middleware_covers_the_subtree_local_does_not() {
  let journal: Journal = Journal::default();

  let mut router = Router::new();
  router.attach("/api/*", vec![journaling(&journal, "global")]);
  router.attach("/api/users", vec![journaling(&journal, "local")]);
  router.route(Method::GET, "/api/users", vec![responding(&journal, "users")]);
  router.route(
    Method::GET,
    "/api/users/:id",
    vec![responding(&journal, "user-by-id")],
  );
  let sealed = router.seal();

  sealed
    .dispatch(RequestContext::new(Method::GET, "/api/users"))
    .await;
  assert_eq!(*journal.lock(), vec!["global", "local", "users"]);

  journal.lock().clear();
  sealed
    .dispatch(RequestContext::new(Method::GET, "/api/users/1"))
    .await;
  assert_eq!(*journal.lock(), vec!["global", "user-by-id"]);
}

#[tokio::test]
async fn chain_order_is_globals_local_then_route_handlers() {
  let journal: Journal = Journal::default();

  let mut router = Router::new();
  router.attach("/a/*", vec![journaling(&journal, "g-a")]);
  router.attach("/a/b/*", vec![journaling(&journal, "g-b")]);
  router.attach("/a/b/c", vec![journaling(&journal, "local")]);
  router.route(
    Method::GET,
    "/a/b/c",
    vec![
      journaling(&journal, "m1"),
      journaling(&journal, "m2"),
      responding(&journal, "h"),
    ],
  );
  let sealed = router.seal();

  sealed
    .dispatch(RequestContext::new(Method::GET, "/a/b/c"))
    .await;
  assert_eq!(*journal.lock(), vec!["g-a", "g-b", "local", "m1", "m2", "h"]);
}

#[tokio::test]
async fn responding_middleware_short_circuits() {
  let journal: Journal = Journal::default();

  let mut router = Router::new();
  router.route(
    Method::GET,
    "/guarded",
    vec![
      responding(&journal, "m1"),
      journaling(&journal, "m2"),
      responding(&journal, "h"),
    ],
  );
  let sealed = router.seal();

  sealed
    .dispatch(RequestContext::new(Method::GET, "/guarded"))
    .await;
  assert_eq!(*journal.lock(), vec!["m1"]);
}

#[tokio::test]
async fn slash_and_suffix_noise_hits_the_root_route() {
  let mut router = Router::new();
  router.get("/", |_ctx: RequestContext| async {
    Ok(Some(ResponseBuilder::new().set_data("root")))
  });
  let sealed = router.seal();

  for path in ["/", "//", "/#section", "/?q=1"] {
    let prepared = sealed.dispatch(RequestContext::new(Method::GET, path)).await;
    assert_eq!(prepared.status, StatusCode::OK, "{path} should reach the root route");
    assert_eq!(&prepared.body[..], b"root");
  }
}

#[tokio::test]
async fn dispatch_is_repeatable_for_the_same_input() {
  let mut router = Router::new();
  router.get("/user/:id", |ctx: RequestContext| async move {
    Ok(Some(ResponseBuilder::new().set_data(ctx.param("id"))))
  });
  let sealed = router.seal();

  let first = sealed
    .dispatch(RequestContext::new(Method::GET, "/user/9"))
    .await;
  let second = sealed
    .dispatch(RequestContext::new(Method::GET, "/user/9"))
    .await;

  assert_eq!(first.status, second.status);
  assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn unregistered_method_yields_404_not_405_or_500() {
  let journal: Journal = Journal::default();
  let mut router = Router::new();
  router.route(Method::GET, "/resource", vec![responding(&journal, "h")]);
  let sealed = router.seal();

  let prepared = sealed
    .dispatch(RequestContext::new(Method::POST, "/resource"))
    .await;
  assert_eq!(prepared.status, StatusCode::NOT_FOUND);
  assert!(journal.lock().is_empty());
}

#[tokio::test]
async fn conflicting_dynamic_sibling_is_rejected_and_first_wins() {
  let journal: Journal = Journal::default();
  let mut router = Router::new();
  router
    .try_route(Method::GET, "/user/:id", vec![responding(&journal, "by-id")])
    .unwrap();

  let err = router
    .try_route(Method::GET, "/user/:name", vec![responding(&journal, "by-name")])
    .unwrap_err();
  assert_eq!(err.code(), "route-conflict");

  let sealed = router.seal();
  let ctx = RequestContext::new(Method::GET, "/user/zoe");
  sealed.dispatch(ctx.clone()).await;
  assert_eq!(ctx.param("id").as_deref(), Some("zoe"));
  assert!(ctx.param("name").is_none());
  assert_eq!(*journal.lock(), vec!["by-id"]);
}

#[tokio::test]
async fn query_string_is_available_to_handlers() {
  let mut router = Router::new();
  router.get("/search", |ctx: RequestContext| async move {
    Ok(Some(
      ResponseBuilder::new().set_data(json!({ "q": ctx.query("q") })),
    ))
  });
  let sealed = router.seal();

  let prepared = sealed
    .dispatch(RequestContext::new(Method::GET, "/search?q=arbor&page=2"))
    .await;
  let body: Value = serde_json::from_slice(&prepared.body).unwrap();
  assert_eq!(body, json!({ "q": "arbor" }));
}
