//! Error type shared by the sample controllers.

use controller_framework::{ActionNotFound, RegistryError};
use thiserror::Error;

/// Errors raised while handling a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// The action is not callable on the controller.
    #[error(transparent)]
    ActionNotFound(#[from] ActionNotFound),

    /// The router resolved a controller name nothing is registered under.
    #[error("No controller named {0}")]
    UnknownController(String),

    /// The request carries no session cookie.
    #[error("Session required")]
    Unauthorized,

    /// Request params failed validation.
    #[error("Invalid params: {0}")]
    Validation(String),

    #[error("Response write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AppError {
    /// The HTTP status the front end answers with.
    pub fn status(&self) -> u16 {
        match self {
            AppError::ActionNotFound(_) | AppError::UnknownController(_) => 404,
            AppError::Unauthorized => 401,
            AppError::Validation(_) => 422,
            AppError::Io(_) | AppError::Registry(_) => 500,
        }
    }
}
