//! Uploads: `index` (inherited), `create`, `show`.
//!
//! Upload widgets post without cookies and pass the session id as a param, so
//! `uploads/create` is the pair the sample whitelists.

use super::application;
use crate::error::AppError;
use async_trait::async_trait;
use controller_framework::{ActionNotFound, Controller, ControllerType, DispatchContext, Hook};
use std::io::Write;
use tracing::info;

#[derive(Debug, Default)]
pub struct UploadsController {
    ctx: DispatchContext,
}

impl UploadsController {
    fn sign_payload(&self, filename: &str) -> String {
        format!("{filename}:{}", filename.len())
    }
}

#[async_trait]
impl Controller for UploadsController {
    const NAME: &'static str = "Uploads";
    const ACTIONS: &'static [&'static str] = &["create", "show", "sign_payload"];
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
            "create" => {
                application::authenticate(self)?;
                let filename = self
                    .params()
                    .get("filename")
                    .cloned()
                    .ok_or_else(|| AppError::Validation("filename is required".to_string()))?;
                let signature = self.sign_payload(&filename);
                info!(%filename, "Upload stored");
                write!(self.response(), "stored {signature}")?;
                self.set_status(201);
                Ok(())
            }
            "show" => {
                let template = self.template_location("show", Some("html"), None);
                write!(self.response(), "{template}")?;
                Ok(())
            }
            "sign_payload" => {
                let signature = self.sign_payload("");
                write!(self.response(), "{signature}")?;
                Ok(())
            }
            other => Err(ActionNotFound::new(other, Self::NAME).into()),
        }
    }

    async fn run_hook(&mut self, hook: Hook) -> Result<(), AppError> {
        application::run_hook(self, hook)
    }
}
