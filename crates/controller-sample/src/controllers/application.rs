//! Base controller and the behaviour every sample controller inherits.

use crate::error::AppError;
use async_trait::async_trait;
use controller_framework::config::DEFAULT_SESSION_ID_KEY;
use controller_framework::{Controller, DispatchContext, Hook};
use std::io::Write;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ApplicationController {
    ctx: DispatchContext,
}

#[async_trait]
impl Controller for ApplicationController {
    const NAME: &'static str = "Application";
    const ACTIONS: &'static [&'static str] = &["index", "authenticate"];
    type Error = AppError;

    fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut DispatchContext {
        &mut self.ctx
    }

    async fn invoke_action(&mut self, action: &str) -> Result<(), AppError> {
        match action {
            "index" => index(self),
            "authenticate" => authenticate(self).map(|_| ()),
            other => Err(controller_framework::ActionNotFound::new(other, Self::NAME).into()),
        }
    }

    async fn run_hook(&mut self, hook: Hook) -> Result<(), AppError> {
        run_hook(self, hook)
    }
}

/// `index`, shared by every controller extending Application.
pub fn index<C: Controller>(controller: &mut C) -> Result<(), AppError> {
    let name = controller.request().controller_name.clone();
    write!(controller.response(), "{name}#index")?;
    Ok(())
}

/// Returns the session id cookie, or [`AppError::Unauthorized`].
///
/// Only cookies count: a session id left in the params by a policy that
/// refused to bridge it is ignored.
pub fn authenticate<C: Controller>(controller: &C) -> Result<String, AppError> {
    controller
        .cookies()
        .get(DEFAULT_SESSION_ID_KEY)
        .cloned()
        .ok_or(AppError::Unauthorized)
}

/// Hooks shared by every controller extending Application.
pub fn run_hook<C: Controller>(controller: &mut C, hook: Hook) -> Result<(), AppError> {
    match hook {
        Hook::BeforeDispatch => {
            controller
                .headers_mut()
                .insert("X-Controller".to_string(), C::NAME.to_string());
        }
        Hook::AfterDispatch => {
            if controller.cookies().contains_key(DEFAULT_SESSION_ID_KEY) {
                controller
                    .headers_mut()
                    .insert("Cache-Control".to_string(), "private, no-store".to_string());
            }
        }
    }
    debug!(controller = C::NAME, %hook, "Hook ran");
    Ok(())
}
