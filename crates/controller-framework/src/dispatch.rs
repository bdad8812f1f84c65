//! # Dispatch Executor
//!
//! Runs one action on a bound controller:
//!
//! ```text
//! Idle ──(not callable)──> Rejected
//!   │
//!   └──(callable)──> Authorized ──> Executing ──> Completed
//!                                 before_dispatch
//!                                 invoke_action
//!                                 after_dispatch
//! ```
//!
//! - A rejected action raises [`ActionNotFound`]; no hook runs and no time is
//!   recorded.
//! - A failing `before_dispatch` stops the dispatch before the action runs.
//! - `after_dispatch` runs whether or not the action succeeded.
//! - The elapsed wall-clock time of the hooks plus the action lands in the
//!   [`ACTION_TIME`] benchmark slot, on success and on failure.
//!
//! Hook and action errors are returned exactly as the controller produced them.

use crate::context::{DispatchPhase, ACTION_TIME};
use crate::controller::{Controller, Hook};
use crate::error::ActionNotFound;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_ACTION: &str = "index";

pub(crate) async fn execute<C: Controller>(controller: &mut C, action: &str) -> Result<(), C::Error> {
    let start = Instant::now();

    if !controller.callable_actions().contains(action) {
        controller.context_mut().set_phase(DispatchPhase::Rejected);
        warn!(controller = C::NAME, action, "Action not found");
        return Err(ActionNotFound::new(action, C::NAME).into());
    }

    controller.context_mut().set_phase(DispatchPhase::Authorized);
    debug!(controller = C::NAME, action, "Dispatch authorized");

    let result = run_bracketed(controller, action).await;

    let elapsed = start.elapsed();
    controller
        .context_mut()
        .benchmarks_mut()
        .record(ACTION_TIME, elapsed);
    controller.context_mut().set_phase(DispatchPhase::Completed);

    match &result {
        Ok(()) => info!(
            controller = C::NAME,
            action,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            status = controller.context().status(),
            "Dispatch ok"
        ),
        Err(e) => warn!(
            controller = C::NAME,
            action,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            error = %e,
            "Dispatch failed"
        ),
    }
    result
}

async fn run_bracketed<C: Controller>(controller: &mut C, action: &str) -> Result<(), C::Error> {
    controller.run_hook(Hook::BeforeDispatch).await?;

    controller.context_mut().set_phase(DispatchPhase::Executing);
    let outcome = controller.invoke_action(action).await;

    let after = controller.run_hook(Hook::AfterDispatch).await;
    match (outcome, after) {
        (Err(e), Err(hook_err)) => {
            warn!(
                controller = C::NAME,
                action,
                error = %hook_err,
                "after_dispatch failed while action was already failing"
            );
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
