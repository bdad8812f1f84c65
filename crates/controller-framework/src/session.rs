//! # Session Transport Bridge
//!
//! Moves a session id from request params into the cookie jar when the
//! [`SessionPolicy`] allows it. Accepting a session id from a URL is a session
//! fixation vector, so two gates apply:
//!
//! 1. `session_id_cookie_only = false` accepts query-string ids everywhere.
//! 2. Otherwise only whitelisted `"controller/action"` pairs accept them. This
//!    lets upload endpoints that cannot send cookies opt in individually.
//!
//! Controllers that resume a session this way should regenerate it.
//!
//! The whitelist key is built from the request's resolved `controller_name`
//! and `action`, not from the matched route pattern. A whitelist written in
//! terms of routes will not match.

use crate::config::{self, SessionPolicy};
use crate::request::Request;
use tracing::{debug, warn};

/// What the bridge did with the request's cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// No session id in params; cookies untouched.
    Absent,
    /// The param value was copied into the session cookie.
    Copied,
    /// A session id was present in params but the policy rejected it.
    Ignored,
}

/// The `"controller/action"` key the whitelist is matched against.
pub fn whitelist_key(request: &Request) -> String {
    config::whitelist_entry(&request.controller_name, &request.action)
}

/// Applies the policy to `request`, copying the session id param into the
/// cookies when allowed.
pub fn bridge_session_id(policy: &SessionPolicy, request: &mut Request) -> BridgeOutcome {
    let key = policy.session_id_key.as_str();
    let Some(session_id) = request.params.get(key) else {
        return BridgeOutcome::Absent;
    };

    if policy.session_id_cookie_only
        && !policy.query_string_whitelist.contains(&whitelist_key(request))
    {
        warn!(
            controller = %request.controller_name,
            action = %request.action,
            "Ignoring session id passed in query string"
        );
        return BridgeOutcome::Ignored;
    }

    let session_id = session_id.clone();
    request.cookies.insert(key.to_string(), session_id);
    debug!(
        controller = %request.controller_name,
        action = %request.action,
        cookie_only = policy.session_id_cookie_only,
        "Session id copied from params to cookies"
    );
    BridgeOutcome::Copied
}
