//! Entry points bundling a clock with the reconciliation loops

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use converge_common::resilience::{
    Attempt, BackoffRetrier, OperationBudget, OperationRateLimiter, RetryResult,
};
use converge_common::testing::{Clock, SystemClock};
use converge_domain::{FieldSource, RemoteError, Result, Snapshot, TaskHandle, TaskStatus};

use crate::destruction::{DestructionBudgets, DestructionOutcome, DestructionPort, DestructionSequencer};
use crate::mutation::MutationSubmitter;
use crate::state::{FieldTargets, StateReconciler};
use crate::tasks::{AsyncTaskTracker, StatusMapping, DEFAULT_RACE_WINDOW_LIMIT};
use crate::trade::MeteredOutcome;

/// One clock, an optional outer deadline, and every reconciliation loop
///
/// Cheap to build; each call constructs its own retrier. The only state
/// shared between calls is the optional rate limiter.
#[derive(Debug, Clone)]
pub struct Reconciler<C: Clock + Clone = SystemClock> {
    clock: C,
    deadline: Option<Instant>,
    race_window_limit: u32,
    rate_limiter: Option<Arc<OperationRateLimiter>>,
}

impl Reconciler<SystemClock> {
    /// Reconciler backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Reconciler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> Reconciler<C> {
    /// Reconciler backed by a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            deadline: None,
            race_window_limit: DEFAULT_RACE_WINDOW_LIMIT,
            rate_limiter: None,
        }
    }

    /// Cap every call at `deadline`, whatever its own budget says
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cap on not-yet-visible answers while awaiting a task
    #[must_use]
    pub fn with_race_window_limit(mut self, limit: u32) -> Self {
        self.race_window_limit = limit;
        self
    }

    /// Take a permit from `limiter` before every remote attempt
    ///
    /// Clones of this reconciler share the limiter, so its buckets bound the
    /// combined call rate of every loop they run.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<OperationRateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Clock every loop waits on
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn retrier(&self) -> BackoffRetrier<C> {
        let mut retrier = BackoffRetrier::with_clock(self.clock.clone());
        if let Some(deadline) = self.deadline {
            retrier = retrier.with_deadline(deadline);
        }
        if let Some(limiter) = &self.rate_limiter {
            retrier = retrier.with_rate_limiter(Arc::clone(limiter));
        }
        retrier
    }

    /// Run `attempt_fn` until success, fatal failure, or budget exhaustion
    pub fn retry<T, E, F>(&self, budget: &OperationBudget, attempt_fn: F) -> RetryResult<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> std::result::Result<T, Attempt<E>>,
    {
        self.retrier().retry(budget, attempt_fn)
    }

    /// Poll a task whose status is already a [`TaskStatus`]
    pub fn await_completion<F>(&self, handle: &TaskHandle, status_fn: F, budget: &OperationBudget) -> Result<()>
    where
        F: FnMut(&TaskHandle) -> std::result::Result<TaskStatus, RemoteError>,
    {
        self.tracker().await_completion(handle, status_fn, budget)
    }

    /// Poll a task, translating raw statuses through `mapping`
    pub fn await_completion_with<S, M, F>(
        &self,
        handle: &TaskHandle,
        mapping: &M,
        status_fn: F,
        budget: &OperationBudget,
    ) -> Result<()>
    where
        M: StatusMapping<S>,
        F: FnMut(&TaskHandle) -> std::result::Result<S, RemoteError>,
    {
        self.tracker().await_completion_with(handle, mapping, status_fn, budget)
    }

    /// Fetch snapshots until `predicate` holds
    pub fn wait_until<S, F, P>(&self, fetch_fn: F, predicate: P, budget: &OperationBudget) -> Result<S>
    where
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
        P: Fn(&S) -> bool,
    {
        self.state().wait_until(fetch_fn, predicate, budget)
    }

    /// Fetch snapshots until every field target is met
    pub fn wait_for_fields<S, F>(&self, fetch_fn: F, targets: &FieldTargets, budget: &OperationBudget) -> Result<S>
    where
        S: FieldSource,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        self.state().wait_for_fields(fetch_fn, targets, budget)
    }

    /// Fetch snapshots until the resource is no longer listed
    pub fn wait_until_absent<S, F>(&self, fetch_fn: F, budget: &OperationBudget) -> Result<()>
    where
        S: Snapshot,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        self.state().wait_until_absent(fetch_fn, budget)
    }

    /// Read a snapshot, waiting out transitional states
    pub fn describe_with_pending_filter<S, F>(&self, fetch_fn: F, budget: &OperationBudget) -> Result<Option<S>>
    where
        S: Snapshot,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        self.state().describe_with_pending_filter(fetch_fn, budget)
    }

    /// Submit a plain mutation
    pub fn submit_mutation<T, F>(&self, operation: &str, budget: &OperationBudget, submit_fn: F) -> Result<T>
    where
        F: FnMut() -> std::result::Result<T, RemoteError>,
    {
        MutationSubmitter::with_retrier(self.retrier()).submit(operation, budget, submit_fn)
    }

    /// Submit a billed mutation, resolving the billing commit race
    pub fn submit_metered_mutation<T, F>(
        &self,
        operation: &str,
        budget: &OperationBudget,
        submit_fn: F,
    ) -> Result<MeteredOutcome<T>>
    where
        F: FnMut() -> std::result::Result<T, RemoteError>,
    {
        MutationSubmitter::with_retrier(self.retrier()).submit_metered(operation, budget, submit_fn)
    }

    /// Tear a resource down and confirm it is gone
    pub fn destroy<P>(&self, port: &P, budgets: &DestructionBudgets) -> Result<DestructionOutcome>
    where
        P: DestructionPort + ?Sized,
    {
        DestructionSequencer::with_retrier(self.retrier()).destroy(port, budgets)
    }

    fn tracker(&self) -> AsyncTaskTracker<C> {
        AsyncTaskTracker::with_retrier(self.retrier()).with_race_window_limit(self.race_window_limit)
    }

    fn state(&self) -> StateReconciler<C> {
        StateReconciler::with_retrier(self.retrier())
    }
}

/// Retry `attempt_fn` on the system clock
pub fn retry<T, E, F>(budget: &OperationBudget, attempt_fn: F) -> RetryResult<T, E>
where
    E: fmt::Display,
    F: FnMut() -> std::result::Result<T, Attempt<E>>,
{
    Reconciler::new().retry(budget, attempt_fn)
}

/// Poll a task on the system clock until it is terminal
pub fn await_completion<F>(handle: &TaskHandle, status_fn: F, budget: &OperationBudget) -> Result<()>
where
    F: FnMut(&TaskHandle) -> std::result::Result<TaskStatus, RemoteError>,
{
    Reconciler::new().await_completion(handle, status_fn, budget)
}

/// Fetch snapshots on the system clock until `predicate` holds
pub fn wait_until<S, F, P>(fetch_fn: F, predicate: P, budget: &OperationBudget) -> Result<S>
where
    F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    P: Fn(&S) -> bool,
{
    Reconciler::new().wait_until(fetch_fn, predicate, budget)
}
