//! # Mock Controller & Testing Guide
//!
//! [`MockController`] is a ready-made [`Controller`] whose hooks and actions do
//! nothing but follow a script. It records every call in a journal, so tests of
//! code that builds and dispatches controllers (front dispatchers, middleware,
//! telemetry) can assert on the exact call sequence and inject failures
//! without writing a controller of their own.
//!
//! ## When to use the mock vs a real controller
//!
//! | Feature | MockController | Real controller |
//! |---------|----------------|-----------------|
//! | **Setup** | None | Type, error, action bodies |
//! | **Call order** | Journal built in | Hand-rolled |
//! | **Error injection** | `return_err` | Requires specific state |
//! | **Use case** | Testing code *around* dispatch | Testing the action bodies |
//!
//! ## Example
//!
//! ```rust
//! use controller_framework::mock::{MockCall, MockController, MockError};
//! use controller_framework::{Builder, Controller, ControllerRegistry, Hook, Request};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let builder = Builder::new(Arc::new(ControllerRegistry::new()));
//!     let mut mock: MockController = builder.build(Request::new("mock", "show"));
//!
//!     mock.expect_hook(Hook::BeforeDispatch).return_ok();
//!     mock.expect_action("show").return_err("database offline");
//!     mock.expect_hook(Hook::AfterDispatch).return_ok();
//!
//!     let err = mock.dispatch("show").await.unwrap_err();
//!     assert!(matches!(err, MockError::Scripted { .. }));
//!     assert_eq!(mock.journal()[1], MockCall::Action("show".into()));
//!     mock.verify();
//! }
//! ```
//!
//! The mock's type name is fixed (`"Mock"`), so hidden actions registered for it
//! are shared by everything using the same registry. Give each test its own
//! [`ControllerRegistry`](crate::ControllerRegistry) when hiding actions.

use crate::context::DispatchContext;
use crate::controller::{Controller, Hook};
use crate::error::ActionNotFound;
use async_trait::async_trait;
use std::collections::VecDeque;

/// One recorded hook run or action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Hook(Hook),
    Action(String),
}

/// Errors produced by [`MockController`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    NotFound(#[from] ActionNotFound),
    #[error("Scripted failure in {call:?}: {message}")]
    Scripted { call: MockCall, message: String },
}

struct Expectation {
    call: MockCall,
    response: Result<(), String>,
}

/// A controller driven by expectations.
///
/// With no expectations queued, every call succeeds. Once expectations are
/// queued, calls must arrive in the queued order.
#[derive(Default)]
pub struct MockController {
    ctx: DispatchContext,
    journal: Vec<MockCall>,
    expectations: VecDeque<Expectation>,
}

impl MockController {
    /// Expects `action` to be invoked next.
    pub fn expect_action(&mut self, action: impl Into<String>) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            call: MockCall::Action(action.into()),
            expectations: &mut self.expectations,
        }
    }

    /// Expects `hook` to run next.
    pub fn expect_hook(&mut self, hook: Hook) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            call: MockCall::Hook(hook),
            expectations: &mut self.expectations,
        }
    }

    /// Every call made so far, in order.
    pub fn journal(&self) -> &[MockCall] {
        &self.journal
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        if !self.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                self.expectations.len()
            );
        }
    }

    fn answer(&mut self, call: MockCall) -> Result<(), MockError> {
        self.journal.push(call.clone());
        let Some(expectation) = self.expectations.pop_front() else {
            return Ok(());
        };
        if expectation.call != call {
            panic!(
                "Unexpected call {:?}, expected {:?}",
                call, expectation.call
            );
        }
        expectation
            .response
            .map_err(|message| MockError::Scripted { call, message })
    }
}

/// Builder for a queued expectation.
pub struct ExpectationBuilder<'a> {
    call: MockCall,
    expectations: &'a mut VecDeque<Expectation>,
}

impl ExpectationBuilder<'_> {
    /// The call succeeds.
    pub fn return_ok(self) {
        self.expectations.push_back(Expectation {
            call: self.call,
            response: Ok(()),
        });
    }

    /// The call fails with [`MockError::Scripted`].
    pub fn return_err(self, message: impl Into<String>) {
        self.expectations.push_back(Expectation {
            call: self.call,
            response: Err(message.into()),
        });
    }
}

#[async_trait]
impl Controller for MockController {
    const NAME: &'static str = "Mock";
    const ACTIONS: &'static [&'static str] = &["index", "show", "new", "create", "edit", "update", "destroy"];
    type Error = MockError;

    fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut DispatchContext {
        &mut self.ctx
    }

    async fn invoke_action(&mut self, action: &str) -> Result<(), MockError> {
        self.answer(MockCall::Action(action.to_string()))
    }

    async fn run_hook(&mut self, hook: Hook) -> Result<(), MockError> {
        self.answer(MockCall::Hook(hook))
    }
}
