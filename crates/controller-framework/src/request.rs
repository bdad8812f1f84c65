//! # Inbound Request
//!
//! The request object handed to the dispatch core by the transport layer.
//! Parsing, routing and session persistence happen elsewhere; by the time a
//! [`Request`] reaches a controller it already carries the resolved
//! `controller_name` / `action` pair along with decoded params and cookies.

use std::collections::HashMap;

/// Decoded query/body parameters.
pub type Params = HashMap<String, String>;

/// Request cookies. Mutable so the session bridge can inject a session id.
pub type Cookies = HashMap<String, String>;

/// Session data attached by the session store. Opaque to the dispatch core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session(HashMap<String, String>);

impl Session {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The route the router matched. Opaque to the dispatch core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub pattern: String,
    pub name: Option<String>,
}

impl Route {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: None,
        }
    }
}

/// A routed request.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub params: Params,
    pub cookies: Cookies,
    pub session: Session,
    pub route: Route,
    pub controller_name: String,
    pub action: String,
}

impl Request {
    /// Creates a request already resolved to `controller_name` / `action`.
    pub fn new(controller_name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller_name: controller_name.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}
