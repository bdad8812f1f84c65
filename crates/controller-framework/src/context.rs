//! # Dispatch Context
//!
//! Per-request state bound onto a controller instance by the
//! [`Builder`](crate::Builder): the request, the response sink, the status and
//! headers the controller starts with, plus the benchmark slots and the phase
//! of the dispatch state machine.
//!
//! A context is owned by exactly one controller and lives as long as the
//! caller keeps that controller around.

use crate::registry::ControllerRegistry;
use crate::request::{Cookies, Params, Request, Route, Session};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// Response headers.
pub type Headers = HashMap<String, String>;

/// Writable target the controller renders into.
pub type ResponseSink = Box<dyn Write + Send>;

pub const DEFAULT_STATUS: u16 = 200;

pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Benchmark slot holding the wall-clock time of the last dispatch.
pub const ACTION_TIME: &str = "action_time";

/// `{"Content-Type": "text/html; charset=utf-8"}`
pub fn default_headers() -> Headers {
    Headers::from([("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string())])
}

/// Where a controller is in its dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPhase {
    #[default]
    Idle,
    Authorized,
    Executing,
    Completed,
    Rejected,
}

/// Named timings collected while a controller runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Benchmarks(HashMap<&'static str, Duration>);

impl Benchmarks {
    pub fn record(&mut self, slot: &'static str, elapsed: Duration) {
        self.0.insert(slot, elapsed);
    }

    pub fn get(&self, slot: &str) -> Option<Duration> {
        self.0.get(slot).copied()
    }

    pub fn action_time(&self) -> Option<Duration> {
        self.get(ACTION_TIME)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// State bound onto a controller for one request.
pub struct DispatchContext {
    request: Request,
    response: ResponseSink,
    status: u16,
    headers: Headers,
    benchmarks: Benchmarks,
    phase: DispatchPhase,
    registry: Arc<ControllerRegistry>,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            request: Request::default(),
            response: Box::new(io::sink()),
            status: DEFAULT_STATUS,
            headers: default_headers(),
            benchmarks: Benchmarks::default(),
            phase: DispatchPhase::Idle,
            registry: ControllerRegistry::global(),
        }
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("request", &self.request)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("benchmarks", &self.benchmarks)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl DispatchContext {
    pub(crate) fn bind(
        &mut self,
        request: Request,
        response: ResponseSink,
        status: u16,
        headers: Headers,
    ) {
        self.request = request;
        self.response = response;
        self.status = status;
        self.headers = headers;
        self.benchmarks = Benchmarks::default();
        self.phase = DispatchPhase::Idle;
    }

    pub(crate) fn set_registry(&mut self, registry: Arc<ControllerRegistry>) {
        self.registry = registry;
    }

    pub(crate) fn set_phase(&mut self, phase: DispatchPhase) {
        self.phase = phase;
    }

    pub(crate) fn benchmarks_mut(&mut self) -> &mut Benchmarks {
        &mut self.benchmarks
    }

    pub fn registry(&self) -> &Arc<ControllerRegistry> {
        &self.registry
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&mut self) -> &mut ResponseSink {
        &mut self.response
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn benchmarks(&self) -> &Benchmarks {
        &self.benchmarks
    }

    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    pub fn params(&self) -> &Params {
        &self.request.params
    }

    pub fn cookies(&self) -> &Cookies {
        &self.request.cookies
    }

    pub fn session(&self) -> &Session {
        &self.request.session
    }

    pub fn route(&self) -> &Route {
        &self.request.route
    }
}
