//! # Application Lifecycle
//!
//! Wires the sample controllers into a running application and plays the part
//! of the front end that the framework leaves to its callers: picking the
//! controller type for a routed request, turning errors into HTTP statuses and
//! collecting what the controller rendered.
//!
//! ## Startup Order
//!
//! Hidden actions must be registered before any controller type is frozen, so
//! [`AppServer::with_registry`] runs in two phases:
//!
//! 1. **Definition** - hide the helper actions on each controller type.
//! 2. **Freeze** - compute every callable set up front, so the first request
//!    does not pay for it and late hiding fails loudly.
//!
//! After that, [`AppServer::handle`] only reads the registry.

use crate::config::AppConfig;
use crate::controllers::{ApplicationController, PostsController, UploadsController};
use crate::error::AppError;
use controller_framework::{
    default_headers, Builder, Controller, ControllerRegistry, Headers, Request, DEFAULT_ACTION,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// What the front end sends back for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    pub action_time: Option<Duration>,
}

/// Response sink the front end can read back after dispatch.
#[derive(Debug, Clone, Default)]
pub struct BodyBuffer(Arc<Mutex<Vec<u8>>>);

impl BodyBuffer {
    pub fn text(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for BodyBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The sample application: a builder over a prepared registry.
#[derive(Debug, Clone)]
pub struct AppServer {
    builder: Builder,
}

impl AppServer {
    /// Starts the application on the process-wide registry.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_registry(ControllerRegistry::global(), config)
    }

    /// Starts the application on `registry`.
    pub fn with_registry(
        registry: Arc<ControllerRegistry>,
        config: AppConfig,
    ) -> Result<Self, AppError> {
        // 1. Definition
        registry.register_hidden(ApplicationController::controller_type(), ["authenticate"])?;
        registry.register_hidden(PostsController::controller_type(), ["load_post"])?;
        registry.register_hidden(UploadsController::controller_type(), ["sign_payload"])?;

        // 2. Freeze
        for ty in [
            ApplicationController::controller_type(),
            PostsController::controller_type(),
            UploadsController::controller_type(),
        ] {
            registry.freeze(ty);
        }

        info!(
            controllers = ?registry.list_subclasses(),
            cookie_only = config.session.session_id_cookie_only,
            whitelist = ?config.session.query_string_whitelist,
            session_expiry_secs = config.session.session_expiry.as_secs(),
            signed_sessions = config.session.session_secret_key.is_some(),
            "Application started"
        );

        Ok(Self {
            builder: Builder::new(registry).with_policy(config.session),
        })
    }

    pub fn registry(&self) -> &Arc<ControllerRegistry> {
        self.builder.registry()
    }

    /// Dispatches a routed request and renders the outcome.
    #[instrument(skip(self, request), fields(controller = %request.controller_name, action = %request.action))]
    pub async fn handle(&self, request: Request) -> Rendered {
        let action = if request.action.is_empty() {
            DEFAULT_ACTION.to_string()
        } else {
            request.action.clone()
        };
        let controller = request.controller_name.clone();
        let body = BodyBuffer::default();

        let result = match controller.as_str() {
            "application" => self.run::<ApplicationController>(request, &action, &body).await,
            "posts" => self.run::<PostsController>(request, &action, &body).await,
            "uploads" => self.run::<UploadsController>(request, &action, &body).await,
            other => Err(AppError::UnknownController(other.to_string())),
        };

        match result {
            Ok((status, headers, action_time)) => Rendered {
                status,
                headers,
                body: body.text(),
                action_time,
            },
            Err(e) => {
                warn!(error = %e, status = e.status(), "Request failed");
                Rendered {
                    status: e.status(),
                    headers: default_headers(),
                    body: e.to_string(),
                    action_time: None,
                }
            }
        }
    }

    async fn run<C>(
        &self,
        request: Request,
        action: &str,
        body: &BodyBuffer,
    ) -> Result<(u16, Headers, Option<Duration>), AppError>
    where
        C: Controller<Error = AppError>,
    {
        let mut controller: C = self.builder.build_into(request, Box::new(body.clone()));
        controller.dispatch(action).await?;
        Ok((
            controller.status(),
            controller.headers().clone(),
            controller.benchmarks().action_time(),
        ))
    }
}
