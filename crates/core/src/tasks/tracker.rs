//! Polling loop for asynchronous tasks

use converge_common::resilience::{Attempt, BackoffRetrier, OperationBudget};
use converge_common::testing::{Clock, SystemClock};
use converge_domain::{ErrorClass, ReconcileError, RemoteError, Result, TaskHandle, TaskStatus};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::mapping::{IdentityMapping, StatusMapping};
use super::ports::TaskStatusPort;
use crate::classify::{classify, CallContext};
use crate::outcome::{remote_attempt, settle, Blocker};

/// Not-yet-visible answers tolerated before the first real status
pub const DEFAULT_RACE_WINDOW_LIMIT: u32 = 20;

const FETCH_STATUS: &str = "fetch_status";

/// Polls a task handle until it reaches a terminal status
///
/// Right after a mutation the control plane may not know the task yet and
/// answer "not found". Those answers are retried, but only until the first
/// successful status fetch and at most `race_window_limit` times.
#[derive(Debug, Clone)]
pub struct AsyncTaskTracker<C: Clock = SystemClock> {
    retrier: BackoffRetrier<C>,
    race_window_limit: u32,
}

impl AsyncTaskTracker<SystemClock> {
    /// Tracker backed by the system clock
    pub fn new() -> Self {
        Self::with_retrier(BackoffRetrier::new())
    }
}

impl Default for AsyncTaskTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AsyncTaskTracker<C> {
    /// Tracker driven by `retrier`
    pub fn with_retrier(retrier: BackoffRetrier<C>) -> Self {
        Self { retrier: retrier.named("await_completion"), race_window_limit: DEFAULT_RACE_WINDOW_LIMIT }
    }

    /// Cap on not-yet-visible answers before the first real status
    #[must_use]
    pub fn with_race_window_limit(mut self, limit: u32) -> Self {
        self.race_window_limit = limit;
        self
    }

    /// Poll `status_fn` until the task succeeds, fails, or the budget runs
    /// out
    pub fn await_completion<F>(
        &self,
        handle: &TaskHandle,
        status_fn: F,
        budget: &OperationBudget,
    ) -> Result<()>
    where
        F: FnMut(&TaskHandle) -> std::result::Result<TaskStatus, RemoteError>,
    {
        self.await_completion_with(handle, &IdentityMapping, status_fn, budget)
    }

    /// Same as [`await_completion`](Self::await_completion) for raw statuses
    /// read through `mapping`
    pub fn await_completion_with<S, M, F>(
        &self,
        handle: &TaskHandle,
        mapping: &M,
        mut status_fn: F,
        budget: &OperationBudget,
    ) -> Result<()>
    where
        M: StatusMapping<S>,
        F: FnMut(&TaskHandle) -> std::result::Result<S, RemoteError>,
    {
        let span = info_span!("await_completion", op_id = %Uuid::new_v4(), handle = %handle);
        let _entered = span.enter();

        let budget = budget.or_awaiting(format!("waiting for task {handle} to complete"));
        let mut status_seen = false;
        let mut race_hits = 0_u32;
        let mut polls = 0_u32;

        let result = self.retrier.retry(&budget, || {
            polls += 1;
            match status_fn(handle) {
                Ok(raw) => {
                    status_seen = true;
                    match mapping.map_status(&raw) {
                        TaskStatus::Pending => {
                            debug!(handle = %handle, poll = polls, "Task still pending");
                            Err(Attempt::retry(Blocker::pending(format!(
                                "task {handle} is still pending"
                            ))))
                        }
                        TaskStatus::Succeeded => Ok(()),
                        TaskStatus::Failed(reason) => {
                            warn!(handle = %handle, reason = %reason, "Task failed");
                            Err(Attempt::fatal(
                                ReconcileError::task_failed(handle.clone(), reason).into(),
                            ))
                        }
                    }
                }
                Err(error) => {
                    let mut class = classify(&error, CallContext::StatusQuery);
                    if class == ErrorClass::RaceWindow {
                        if status_seen || race_hits >= self.race_window_limit {
                            class = ErrorClass::Fatal;
                        } else {
                            race_hits += 1;
                            debug!(
                                handle = %handle,
                                code = error.code().unwrap_or_default(),
                                race_hits,
                                "Task not visible yet"
                            );
                        }
                    }
                    Err(remote_attempt(FETCH_STATUS, error, class))
                }
            }
        });

        let outcome = settle(result);
        if outcome.is_ok() {
            info!(handle = %handle, polls, "Task completed");
        }
        outcome
    }

    /// Poll through a [`TaskStatusPort`]
    pub fn await_port<S, M, P>(
        &self,
        handle: &TaskHandle,
        mapping: &M,
        port: &P,
        budget: &OperationBudget,
    ) -> Result<()>
    where
        M: StatusMapping<S>,
        P: TaskStatusPort<S> + ?Sized,
    {
        self.await_completion_with(handle, mapping, |h| port.fetch_status(h), budget)
    }
}
