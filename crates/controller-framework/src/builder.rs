//! # Controller Instance Builder
//!
//! Allocates a controller for one request and binds the request state onto
//! it. The builder carries the two process-wide collaborators every controller
//! needs: the type registry consulted at dispatch time, and the session policy
//! applied while binding.

use crate::config::SessionPolicy;
use crate::context::{default_headers, Headers, ResponseSink, DEFAULT_STATUS};
use crate::controller::Controller;
use crate::registry::ControllerRegistry;
use crate::request::Request;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// Builds bound controller instances.
///
/// ```rust
/// use controller_framework::{ActionNotFound, Builder, Controller, DispatchContext, Request};
/// use async_trait::async_trait;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error(transparent)]
/// struct PagesError(#[from] ActionNotFound);
///
/// #[derive(Default)]
/// struct Pages { ctx: DispatchContext }
///
/// #[async_trait]
/// impl Controller for Pages {
///     const NAME: &'static str = "Pages";
///     const ACTIONS: &'static [&'static str] = &["index"];
///     type Error = PagesError;
///     fn context(&self) -> &DispatchContext { &self.ctx }
///     fn context_mut(&mut self) -> &mut DispatchContext { &mut self.ctx }
///     async fn invoke_action(&mut self, _: &str) -> Result<(), PagesError> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut pages: Pages = Builder::default().build(Request::new("pages", "index"));
///     assert_eq!(pages.status(), 200);
///     pages.dispatch("index").await.unwrap();
///     assert!(pages.benchmarks().action_time().is_some());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    registry: Arc<ControllerRegistry>,
    policy: Arc<SessionPolicy>,
}

impl Default for Builder {
    /// The global registry with the default (cookie-only) session policy.
    fn default() -> Self {
        Self::new(ControllerRegistry::global())
    }
}

impl Builder {
    pub fn new(registry: Arc<ControllerRegistry>) -> Self {
        Self {
            registry,
            policy: Arc::new(SessionPolicy::default()),
        }
    }

    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn registry(&self) -> &Arc<ControllerRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Builds a controller with a discarding response sink, status 200 and the
    /// default `Content-Type` header.
    pub fn build<C: Controller>(&self, request: Request) -> C {
        self.build_with(request, Box::new(io::sink()), DEFAULT_STATUS, default_headers())
    }

    /// Builds a controller writing into `response`.
    pub fn build_into<C: Controller>(&self, request: Request, response: ResponseSink) -> C {
        self.build_with(request, response, DEFAULT_STATUS, default_headers())
    }

    pub fn build_with<C: Controller>(
        &self,
        request: Request,
        response: ResponseSink,
        status: u16,
        headers: Headers,
    ) -> C {
        self.registry.define(C::controller_type());

        let mut controller = C::default();
        controller
            .context_mut()
            .set_registry(Arc::clone(&self.registry));
        let outcome =
            controller.set_dispatch_variables(request, response, status, headers, &self.policy);
        debug!(controller = C::NAME, ?outcome, status, "Controller built");
        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DispatchContext;
    use crate::error::ActionNotFound;
    use crate::session::BridgeOutcome;
    use async_trait::async_trait;

    #[derive(Debug, thiserror::Error)]
    #[error(transparent)]
    struct UploadsError(#[from] ActionNotFound);

    #[derive(Default)]
    struct Uploads {
        ctx: DispatchContext,
    }

    #[async_trait]
    impl Controller for Uploads {
        const NAME: &'static str = "Uploads";
        const ACTIONS: &'static [&'static str] = &["create"];
        type Error = UploadsError;

        fn context(&self) -> &DispatchContext {
            &self.ctx
        }

        fn context_mut(&mut self) -> &mut DispatchContext {
            &mut self.ctx
        }

        async fn invoke_action(&mut self, _action: &str) -> Result<(), UploadsError> {
            Ok(())
        }
    }

    fn isolated() -> Builder {
        Builder::new(Arc::new(ControllerRegistry::new()))
    }

    #[test]
    fn build_applies_default_status_and_headers() {
        let uploads: Uploads = isolated().build(Request::new("uploads", "create"));

        assert_eq!(uploads.status(), 200);
        assert_eq!(
            uploads.headers(),
            &Headers::from([(
                "Content-Type".to_string(),
                "text/html; charset=utf-8".to_string()
            )])
        );
        assert_eq!(uploads.request().action, "create");
    }

    #[test]
    fn build_with_keeps_supplied_state() {
        let headers = Headers::from([("Content-Type".to_string(), "application/json".to_string())]);
        let uploads: Uploads = isolated().build_with(
            Request::new("uploads", "create"),
            Box::new(Vec::new()),
            201,
            headers.clone(),
        );

        assert_eq!(uploads.status(), 201);
        assert_eq!(uploads.headers(), &headers);
    }

    #[test]
    fn build_defines_the_type() {
        let builder = isolated();
        let _: Uploads = builder.build(Request::new("uploads", "create"));
        let _: Uploads = builder.build(Request::new("uploads", "create"));

        let names: Vec<_> = builder.registry().list_subclasses().into_iter().collect();
        assert_eq!(names, vec!["Uploads".to_string()]);
    }

    #[test]
    fn build_bridges_session_id_under_policy() {
        let request = || Request::new("uploads", "create").with_param("_session_id", "s3cr3t");

        let strict: Uploads = isolated().build(request());
        assert!(strict.cookies().is_empty());

        let whitelisted: Uploads = isolated()
            .with_policy(SessionPolicy::default().whitelist(["uploads/create"]))
            .build(request());
        assert_eq!(whitelisted.cookies()["_session_id"], "s3cr3t");

        let mut relaxed: Uploads = isolated()
            .with_policy(SessionPolicy::default().cookie_only(false))
            .build(request());
        assert_eq!(relaxed.cookies()["_session_id"], "s3cr3t");

        // rebinding reports what the bridge did
        let outcome = relaxed.set_dispatch_variables(
            Request::new("uploads", "create"),
            Box::new(io::sink()),
            200,
            default_headers(),
            &SessionPolicy::default(),
        );
        assert_eq!(outcome, BridgeOutcome::Absent);
    }
}
