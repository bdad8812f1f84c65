//! # Controller Framework
//!
//! The request-dispatch core of a controller layer for web applications. Given
//! a routed request and an action name, it decides whether the action may be
//! called, binds the request and response onto a fresh controller, runs the
//! action inside its `before_dispatch` / `after_dispatch` hooks, and times it.
//!
//! Transport, routing, templates and session storage are someone else's job.
//! This crate only needs the [`Request`] they produce and the action bodies and
//! hooks a [`Controller`] implementation supplies.
//!
//! ## Architecture Overview
//!
//! 1. **Type Registry** ([`ControllerRegistry`]) - which actions each controller
//!    type accepts (declared minus hidden, inherited down the parent chain), and
//!    which controller types exist.
//! 2. **Builder** ([`Builder`]) - allocates a controller per request and binds
//!    the request state.
//! 3. **Session Bridge** ([`session`]) - during binding, moves a session id from
//!    the query string into the cookies when the [`SessionPolicy`] allows it.
//! 4. **Dispatch Executor** ([`Controller::dispatch`]) - authorization, hooks,
//!    timing.
//!
//! ## Example
//!
//! ```rust
//! use controller_framework::{
//!     ActionNotFound, Builder, Controller, ControllerRegistry, ControllerType, DispatchContext,
//!     Hook, Request,
//! };
//! use async_trait::async_trait;
//! use std::io::Write;
//! use std::sync::Arc;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum PostsError {
//!     #[error(transparent)]
//!     NotFound(#[from] ActionNotFound),
//!     #[error("render failed: {0}")]
//!     Render(#[from] std::io::Error),
//! }
//!
//! #[derive(Default)]
//! struct Posts {
//!     ctx: DispatchContext,
//! }
//!
//! #[async_trait]
//! impl Controller for Posts {
//!     const NAME: &'static str = "Posts";
//!     const ACTIONS: &'static [&'static str] = &["index", "show", "load_post"];
//!     type Error = PostsError;
//!
//!     fn context(&self) -> &DispatchContext { &self.ctx }
//!     fn context_mut(&mut self) -> &mut DispatchContext { &mut self.ctx }
//!
//!     async fn invoke_action(&mut self, action: &str) -> Result<(), PostsError> {
//!         let body = format!("rendering {}", self.template_location(action, Some("html"), None));
//!         self.response().write_all(body.as_bytes())?;
//!         Ok(())
//!     }
//!
//!     async fn run_hook(&mut self, hook: Hook) -> Result<(), PostsError> {
//!         if hook == Hook::BeforeDispatch {
//!             self.headers_mut().insert("X-Frame-Options".into(), "DENY".into());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(ControllerRegistry::new());
//!     // Hide helpers before the first dispatch.
//!     registry.register_hidden(ControllerType::of::<Posts>(), ["load_post"]).unwrap();
//!
//!     let builder = Builder::new(registry);
//!     let mut posts: Posts = builder.build(Request::new("posts", "show"));
//!     posts.dispatch("show").await.unwrap();
//!     assert_eq!(posts.headers()["X-Frame-Options"], "DENY");
//!
//!     let mut posts: Posts = builder.build(Request::new("posts", "load_post"));
//!     assert!(matches!(posts.dispatch("load_post").await, Err(PostsError::NotFound(_))));
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockController`](mock::MockController), a
//! scripted controller that journals every hook and action call.

pub mod builder;
pub mod config;
pub mod context;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod mock;
pub mod registry;
pub mod request;
pub mod session;
pub mod tracing;

// Re-export core types for convenience
pub use builder::Builder;
pub use config::SessionPolicy;
pub use context::{
    default_headers, Benchmarks, DispatchContext, DispatchPhase, Headers, ResponseSink,
    ACTION_TIME, DEFAULT_STATUS,
};
pub use controller::{Controller, Hook};
pub use dispatch::DEFAULT_ACTION;
pub use error::{ActionNotFound, RegistryError};
pub use registry::{ActionSet, ControllerRegistry, ControllerType};
pub use request::{Cookies, Params, Request, Route, Session};
pub use session::BridgeOutcome;
