//! # Controller Framework Sample
//!
//! A small application built on the controller framework.
//!
//! ## Core Components
//!
//! - **[controllers]**: [`ApplicationController`] and the two controllers that
//!   extend it.
//! - **[lifecycle]**: [`AppServer`], which hides helper actions, freezes the
//!   registry and turns routed requests into rendered responses.
//! - **[config]**: the session policy, read from the environment.
//!
//! The entry point replays a handful of routed requests, including a session
//! id smuggled through the query string of a non-whitelisted action.
//!
//! ```bash
//! RUST_LOG=info cargo run -p controller-sample
//! SESSION_ID_COOKIE_ONLY=false RUST_LOG=debug cargo run -p controller-sample
//! ```

use controller_framework::tracing::setup_tracing;
use controller_framework::Request;
use controller_sample::config::AppConfig;
use controller_sample::lifecycle::AppServer;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env();
    let app = AppServer::new(config).map_err(|e| e.to_string())?;

    let requests = vec![
        Request::new("posts", "index"),
        Request::new("posts", "show").with_param("id", "7"),
        Request::new("posts", "load_post").with_param("id", "7"),
        Request::new("uploads", "create")
            .with_param("_session_id", "flash-session")
            .with_param("filename", "cat.png"),
        Request::new("posts", "create")
            .with_param("_session_id", "fixated-session")
            .with_param("title", "Hello"),
        Request::new("admin", "index"),
    ];

    for request in requests {
        let span = tracing::info_span!("request", path = %format!("{}/{}", request.controller_name, request.action));
        let rendered = app.handle(request).instrument(span).await;
        info!(
            status = rendered.status,
            body = %rendered.body,
            action_time = ?rendered.action_time,
            "Rendered"
        );
    }

    info!(controllers = ?app.registry().list_subclasses(), "Application completed");
    Ok(())
}
