//! # Controller Trait
//!
//! The `Controller` trait is the contract every request handler type implements
//! to be built and dispatched by the framework. A type declares its name, the
//! actions it offers and the type it extends; it supplies the action bodies and
//! the hook runner. The framework supplies binding, authorization, the hook
//! bracket and timing.
//!
//! # Required Items
//! - [`Controller::NAME`], [`Controller::ACTIONS`], [`Controller::Error`]
//! - [`Controller::context`] / [`Controller::context_mut`]: where the bound state lives
//! - [`Controller::invoke_action`]: runs an action body by name
//!
//! # Provided Methods
//! - [`Controller::parent`]: `None` unless the type extends another controller
//! - [`Controller::run_hook`]: does nothing (`Ok(())`) unless overridden
//! - [`Controller::dispatch`]: the authorized, hook-bracketed, timed entry point
//! - request/response accessors

use crate::config::SessionPolicy;
use crate::context::{Benchmarks, DispatchContext, Headers, ResponseSink};
use crate::dispatch;
use crate::error::ActionNotFound;
use crate::registry::{ActionSet, ControllerType};
use crate::request::{Cookies, Params, Request, Route, Session};
use crate::session::{self, BridgeOutcome};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Named points in the dispatch where a controller can run its own logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeDispatch,
    AfterDispatch,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BeforeDispatch => "before_dispatch",
            Hook::AfterDispatch => "after_dispatch",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait that every controller type implements to be dispatched by the framework.
///
/// # Inheritance
/// Rust has no class inheritance, so a controller that "extends" another names
/// its parent through [`Controller::parent`]. The registry walks that chain to
/// merge declared actions and hidden actions. Actions inherited this way must
/// still be routed by the child's [`Controller::invoke_action`].
///
/// # Async
/// This trait is `#[async_trait]` so hooks and action bodies may await. The
/// framework itself never suspends between them.
#[async_trait]
pub trait Controller: Default + Send + 'static {
    /// Stable type name, used for the registry and diagnostics.
    const NAME: &'static str;

    /// Public actions declared on this type. Inherited actions are merged in
    /// from the parent chain.
    const ACTIONS: &'static [&'static str];

    /// The error type for hooks and actions. Must be able to carry an
    /// [`ActionNotFound`] so rejected dispatches surface through it.
    type Error: std::error::Error + From<ActionNotFound> + Send + Sync + 'static;

    /// The controller type this one extends.
    fn parent() -> Option<ControllerType> {
        None
    }

    fn context(&self) -> &DispatchContext;

    fn context_mut(&mut self) -> &mut DispatchContext;

    /// Runs the body of `action`. Only called for authorized actions.
    async fn invoke_action(&mut self, action: &str) -> Result<(), Self::Error>;

    /// Runs the controller's callbacks for `hook`.
    async fn run_hook(&mut self, _hook: Hook) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Provided ---

    fn controller_type() -> ControllerType {
        ControllerType::of::<Self>()
    }

    /// The actions this type accepts, from the registry bound to the instance.
    fn callable_actions(&self) -> Arc<ActionSet> {
        self.context()
            .registry()
            .callable_actions(Self::controller_type())
    }

    /// Binds per-request state, bridging a query-string session id into the
    /// cookies when `policy` allows it.
    fn set_dispatch_variables(
        &mut self,
        mut request: Request,
        response: ResponseSink,
        status: u16,
        headers: Headers,
        policy: &SessionPolicy,
    ) -> BridgeOutcome {
        let outcome = session::bridge_session_id(policy, &mut request);
        self.context_mut().bind(request, response, status, headers);
        outcome
    }

    /// Dispatches `action` through authorization, hooks and timing.
    async fn dispatch(&mut self, action: &str) -> Result<(), Self::Error> {
        dispatch::execute(self, action).await
    }

    /// `"controller/action.type"`, the template path for an action.
    fn template_location(&self, action: &str, format: Option<&str>, controller: Option<&str>) -> String {
        let controller = controller.unwrap_or(&self.context().request().controller_name);
        match format {
            Some(format) => format!("{controller}/{action}.{format}"),
            None => format!("{controller}/{action}"),
        }
    }

    fn request(&self) -> &Request {
        self.context().request()
    }

    fn response(&mut self) -> &mut ResponseSink {
        self.context_mut().response()
    }

    fn headers(&self) -> &Headers {
        self.context().headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.context_mut().headers_mut()
    }

    fn status(&self) -> u16 {
        self.context().status()
    }

    fn set_status(&mut self, status: u16) {
        self.context_mut().set_status(status);
    }

    fn params(&self) -> &Params {
        self.context().params()
    }

    fn cookies(&self) -> &Cookies {
        self.context().cookies()
    }

    fn session(&self) -> &Session {
        self.context().session()
    }

    fn route(&self) -> &Route {
        self.context().route()
    }

    fn benchmarks(&self) -> &Benchmarks {
        self.context().benchmarks()
    }
}
