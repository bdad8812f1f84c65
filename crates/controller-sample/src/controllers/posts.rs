//! Posts: `index` (inherited), `show`, `create`.

use super::application;
use crate::error::AppError;
use async_trait::async_trait;
use controller_framework::{ActionNotFound, Controller, ControllerType, DispatchContext, Hook};
use std::io::Write;

#[derive(Debug, Default)]
pub struct PostsController {
    ctx: DispatchContext,
}

impl PostsController {
    /// Helper shared by `show` and friends. Public, hence hidden by the app.
    fn load_post(&self) -> Result<u32, AppError> {
        let raw = self
            .params()
            .get("id")
            .ok_or_else(|| AppError::Validation("id is required".to_string()))?;
        raw.parse()
            .map_err(|_| AppError::Validation(format!("id must be numeric, got {raw:?}")))
    }
}

#[async_trait]
impl Controller for PostsController {
    const NAME: &'static str = "Posts";
    const ACTIONS: &'static [&'static str] = &["show", "create", "load_post"];
    type Error = AppError;

    fn parent() -> Option<ControllerType> {
        Some(ControllerType::of::<application::ApplicationController>())
    }

    fn context(&self) -> &DispatchContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut DispatchContext {
        &mut self.ctx
    }

    async fn invoke_action(&mut self, action: &str) -> Result<(), AppError> {
        match action {
            "index" => application::index(self),
            "show" => {
                let id = self.load_post()?;
                write!(self.response(), "post {id}")?;
                Ok(())
            }
            "create" => {
                application::authenticate(self)?;
                let title = self
                    .params()
                    .get("title")
                    .filter(|t| !t.trim().is_empty())
                    .cloned()
                    .ok_or_else(|| AppError::Validation("title is required".to_string()))?;
                write!(self.response(), "created {title}")?;
                self.set_status(201);
                Ok(())
            }
            "load_post" => self.load_post().map(|_| ()),
            other => Err(ActionNotFound::new(other, Self::NAME).into()),
        }
    }

    async fn run_hook(&mut self, hook: Hook) -> Result<(), AppError> {
        application::run_hook(self, hook)
    }
}
