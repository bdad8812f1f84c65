use controller_framework::{ControllerRegistry, ControllerType, Request, RegistryError};
use controller_sample::config::AppConfig;
use controller_sample::controllers::{ApplicationController, PostsController, UploadsController};
use controller_sample::error::AppError;
use controller_sample::lifecycle::AppServer;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;

fn app() -> AppServer {
    AppServer::with_registry(
        Arc::new(ControllerRegistry::new()),
        AppConfig::with_upload_whitelist(),
    )
    .expect("Failed to start app")
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// End-to-end run through the app with real controllers.
#[tokio::test]
async fn test_full_request_cycle() {
    let app = app();

    // Callable sets: declared + inherited, minus hidden helpers
    let registry = app.registry();
    assert_eq!(
        *registry.callable_actions(ControllerType::of::<PostsController>()),
        names(&["create", "index", "show"])
    );
    assert_eq!(
        *registry.callable_actions(ControllerType::of::<UploadsController>()),
        names(&["create", "index", "show"])
    );
    assert_eq!(
        *registry.callable_actions(ControllerType::of::<ApplicationController>()),
        names(&["index"])
    );
    assert_eq!(
        registry.list_subclasses(),
        names(&["Application", "Posts", "Uploads"])
    );

    // Inherited index
    let rendered = app.handle(Request::new("posts", "index")).await;
    assert_eq!(rendered.status, 200);
    assert_eq!(rendered.body, "posts#index");
    assert_eq!(rendered.headers["X-Controller"], "Posts");
    assert_eq!(rendered.headers["Content-Type"], "text/html; charset=utf-8");
    assert!(rendered.action_time.is_some());

    // Empty action falls back to index
    let rendered = app.handle(Request::new("uploads", "")).await;
    assert_eq!(rendered.body, "uploads#index");

    // Own action with params
    let rendered = app
        .handle(Request::new("posts", "show").with_param("id", "7"))
        .await;
    assert_eq!(rendered.status, 200);
    assert_eq!(rendered.body, "post 7");

    // Template location helper
    let rendered = app.handle(Request::new("uploads", "show")).await;
    assert_eq!(rendered.body, "uploads/show.html");
}

#[tokio::test]
async fn test_hidden_and_unknown_actions_are_not_found() {
    let app = app();

    for (controller, action) in [
        ("posts", "load_post"),
        ("posts", "authenticate"),
        ("uploads", "sign_payload"),
        ("application", "authenticate"),
        ("posts", "missing_action"),
    ] {
        let rendered = app
            .handle(Request::new(controller, action).with_param("id", "1"))
            .await;
        assert_eq!(rendered.status, 404, "{controller}/{action}");
        assert!(rendered.body.contains(action));
        assert!(rendered.action_time.is_none());
    }

    let rendered = app.handle(Request::new("admin", "index")).await;
    assert_eq!(rendered.status, 404);
    assert_eq!(rendered.body, "No controller named admin");
}

#[tokio::test]
async fn test_action_errors_map_to_statuses() {
    let app = app();

    let rendered = app.handle(Request::new("posts", "show")).await;
    assert_eq!(rendered.status, 422);
    assert_eq!(rendered.body, "Invalid params: id is required");

    let rendered = app
        .handle(Request::new("posts", "show").with_param("id", "seven"))
        .await;
    assert_eq!(rendered.status, 422);

    let rendered = app
        .handle(Request::new("posts", "create").with_param("title", "Hello"))
        .await;
    assert_eq!(rendered.status, 401);
}

#[tokio::test]
async fn test_cookie_session_reaches_actions() {
    let app = app();

    let rendered = app
        .handle(
            Request::new("posts", "create")
                .with_cookie("_session_id", "cookie-session")
                .with_param("title", "Hello"),
        )
        .await;

    assert_eq!(rendered.status, 201);
    assert_eq!(rendered.body, "created Hello");
    assert_eq!(rendered.headers["Cache-Control"], "private, no-store");
}

#[test]
fn test_starting_twice_on_a_frozen_registry_fails() {
    let registry = Arc::new(ControllerRegistry::new());
    AppServer::with_registry(Arc::clone(&registry), AppConfig::default()).unwrap();

    let err = AppServer::with_registry(registry, AppConfig::default()).unwrap_err();
    assert!(matches!(err, AppError::Registry(RegistryError::Frozen { .. })));
    assert_eq!(err.status(), 500);
}
