//! # Session Policy
//!
//! Configuration read by the session transport bridge. Loading is the job of
//! the embedding application; this type only derives `serde` so any loader can
//! produce it, and falls back to the safe defaults for missing fields.
//!
//! | Option | Default |
//! |--------|---------|
//! | `session_id_cookie_only` | `true` |
//! | `query_string_whitelist` | empty |
//! | `session_id_key` | `"_session_id"` |
//! | `session_expiry` | two weeks |
//! | `session_secret_key` | unset |

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_SESSION_ID_KEY: &str = "_session_id";

pub const DEFAULT_SESSION_EXPIRY: Duration = Duration::from_secs(60 * 60 * 24 * 7 * 2);

/// Policy governing whether a session id may arrive through the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// When set, query-string session ids are ignored unless the
    /// `controller/action` pair is whitelisted.
    pub session_id_cookie_only: bool,
    /// `"controller/action"` pairs allowed to carry a session id in params.
    pub query_string_whitelist: HashSet<String>,
    /// Param and cookie name carrying the session id.
    pub session_id_key: String,
    /// Lifetime of a session. Not read by the bridge; carried for the session
    /// store that issues the cookie.
    pub session_expiry: Duration,
    /// Signing key for the session store. Unset means sessions are unsigned.
    pub session_secret_key: Option<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            session_id_cookie_only: true,
            query_string_whitelist: HashSet::new(),
            session_id_key: DEFAULT_SESSION_ID_KEY.to_string(),
            session_expiry: DEFAULT_SESSION_EXPIRY,
            session_secret_key: None,
        }
    }
}

impl SessionPolicy {
    pub fn cookie_only(mut self, cookie_only: bool) -> Self {
        self.session_id_cookie_only = cookie_only;
        self
    }

    /// Whitelists `"controller/action"` entries for query-string session ids.
    pub fn whitelist<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_string_whitelist
            .extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn session_id_key(mut self, key: impl Into<String>) -> Self {
        self.session_id_key = key.into();
        self
    }

    pub fn secret_key(mut self, key: impl Into<String>) -> Self {
        self.session_secret_key = Some(key.into());
        self
    }

    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.session_expiry = expiry;
        self
    }

    pub fn is_whitelisted(&self, controller_name: &str, action: &str) -> bool {
        self.query_string_whitelist
            .contains(&whitelist_entry(controller_name, action))
    }
}

/// The `"controller/action"` form whitelist entries are written in.
pub fn whitelist_entry(controller_name: &str, action: &str) -> String {
    format!("{controller_name}/{action}")
}
