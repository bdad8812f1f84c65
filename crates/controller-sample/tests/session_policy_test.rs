use controller_framework::{ControllerRegistry, Request, SessionPolicy};
use controller_sample::config::AppConfig;
use controller_sample::lifecycle::AppServer;
use std::sync::Arc;

fn app_with(session: SessionPolicy) -> AppServer {
    AppServer::with_registry(Arc::new(ControllerRegistry::new()), AppConfig { session })
        .expect("Failed to start app")
}

fn upload(session_id: &str) -> Request {
    Request::new("uploads", "create")
        .with_param("_session_id", session_id)
        .with_param("filename", "cat.png")
}

/// The whitelisted upload endpoint resumes a session passed in the query string.
#[tokio::test]
async fn test_whitelisted_upload_accepts_query_string_session() {
    let app = app_with(SessionPolicy::default().whitelist(["uploads/create"]));

    let rendered = app.handle(upload("flash-session")).await;

    assert_eq!(rendered.status, 201);
    assert_eq!(rendered.body, "stored cat.png:7");
}

/// Cookie-only mode with an empty whitelist ignores query-string sessions.
#[tokio::test]
async fn test_cookie_only_rejects_query_string_session() {
    let app = app_with(SessionPolicy::default());

    let rendered = app.handle(upload("fixated-session")).await;

    assert_eq!(rendered.status, 401);
}

/// A whitelist entry for one action does not open up the rest of the app.
#[tokio::test]
async fn test_whitelist_is_per_action() {
    let app = app_with(SessionPolicy::default().whitelist(["uploads/create"]));

    let rendered = app
        .handle(
            Request::new("posts", "create")
                .with_param("_session_id", "fixated-session")
                .with_param("title", "Hello"),
        )
        .await;

    assert_eq!(rendered.status, 401);
}

/// With cookie-only mode off, every action accepts a query-string session.
#[tokio::test]
async fn test_relaxed_policy_accepts_everywhere() {
    let app = app_with(SessionPolicy::default().cookie_only(false));

    let rendered = app.handle(upload("any-session")).await;
    assert_eq!(rendered.status, 201);

    let rendered = app
        .handle(
            Request::new("posts", "create")
                .with_param("_session_id", "any-session")
                .with_param("title", "Hello"),
        )
        .await;
    assert_eq!(rendered.status, 201);
    assert_eq!(rendered.headers["Cache-Control"], "private, no-store");
}
