//! # Observability & Tracing
//!
//! The dispatch core logs through the `tracing` crate with structured fields
//! rather than formatted strings, so log lines can be filtered by controller or
//! action in production.
//!
//! ## What Gets Traced
//!
//! | Event | Level | Fields |
//! |-------|-------|--------|
//! | Controller type defined | `debug` | `controller` |
//! | Hidden actions registered / rejected after freeze | `debug` / `warn` | `controller`, `hidden`, `frozen` |
//! | Callable actions frozen | `info` | `controller`, `actions` |
//! | Controller built | `debug` | `controller`, `outcome`, `status` |
//! | Query-string session id ignored | `warn` | `controller`, `action` |
//! | Dispatch rejected | `warn` | `controller`, `action` |
//! | Dispatch ok / failed | `info` / `warn` | `controller`, `action`, `elapsed_ms`, `status` / `error` |
//!
//! ## Usage
//!
//! ```bash
//! # Dispatch summaries
//! RUST_LOG=info cargo run -p controller-sample
//!
//! # Registry and session bridge details
//! RUST_LOG=debug cargo run -p controller-sample
//!
//! # Only the framework
//! RUST_LOG=controller_framework=debug cargo run -p controller-sample
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once at program start. Libraries and tests should not call it.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
