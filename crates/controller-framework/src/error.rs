//! # Framework Errors
//!
//! This module defines the error types originated by the dispatch core itself.
//!
//! The core only ever *originates* two kinds of failure:
//!
//! - [`ActionNotFound`] when a dispatch targets an action outside the callable set.
//! - [`RegistryError`] when the type registry is used out of order.
//!
//! Everything raised by hooks or action bodies is the controller's own
//! [`Controller::Error`](crate::Controller::Error) and passes through untouched.

/// The requested action is not part of the controller's callable set.
///
/// Every controller error type must implement `From<ActionNotFound>` so that
/// [`Controller::dispatch`](crate::Controller::dispatch) can surface it in the
/// controller's own error channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Action '{action}' was not found in {controller}")]
pub struct ActionNotFound {
    pub action: String,
    pub controller: String,
}

impl ActionNotFound {
    pub fn new(action: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            controller: controller.into(),
        }
    }
}

/// Misuse of the process-wide controller type registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Hidden actions were registered after the callable set of the type (or of
    /// one of its descendants) had already been computed.
    #[error("Cannot hide {names:?} on {controller}: callable actions already frozen for {frozen}")]
    Frozen {
        controller: String,
        frozen: String,
        names: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_not_found_names_action_and_controller() {
        let err = ActionNotFound::new("destroy", "Uploads");
        assert_eq!(err.to_string(), "Action 'destroy' was not found in Uploads");
    }
}
