//! # Application Configuration
//!
//! The sample reads its session policy from the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SESSION_ID_COOKIE_ONLY` | `true` / `false` | `true` |
//! | `QUERY_STRING_WHITELIST` | comma separated `controller/action` pairs | `uploads/create` |
//!
//! The session id key stays at its default (`_session_id`); the sample
//! controllers read the cookie under that name.

use controller_framework::SessionPolicy;
use serde::Deserialize;
use tracing::warn;

/// Top-level settings for the sample application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionPolicy,
}

impl AppConfig {
    /// Upload endpoints get query-string sessions, everything else is cookie only.
    pub fn with_upload_whitelist() -> Self {
        Self {
            session: SessionPolicy::default().whitelist(["uploads/create"]),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::with_upload_whitelist();

        if let Some(raw) = lookup("SESSION_ID_COOKIE_ONLY") {
            match raw.trim().parse::<bool>() {
                Ok(flag) => config.session.session_id_cookie_only = flag,
                Err(_) => warn!(value = %raw, "Ignoring invalid SESSION_ID_COOKIE_ONLY"),
            }
        }

        if let Some(raw) = lookup("QUERY_STRING_WHITELIST") {
            config.session.query_string_whitelist = raw
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }
}
