//! Polling loops over fresh snapshots

use converge_common::resilience::{Attempt, BackoffRetrier, OperationBudget};
use converge_common::testing::{Clock, SystemClock};
use converge_domain::{FieldSource, Lifecycle, RemoteError, Result, Snapshot};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::ports::SnapshotPort;
use super::targets::FieldTargets;
use crate::classify::{classify, CallContext};
use crate::outcome::{remote_attempt, settle, Blocker};

const FETCH_SNAPSHOT: &str = "fetch_snapshot";

/// Fetches snapshots until they satisfy a condition
#[derive(Debug, Clone)]
pub struct StateReconciler<C: Clock = SystemClock> {
    retrier: BackoffRetrier<C>,
}

impl StateReconciler<SystemClock> {
    /// Reconciler backed by the system clock
    pub fn new() -> Self {
        Self::with_retrier(BackoffRetrier::new())
    }
}

impl Default for StateReconciler<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

fn read_attempt(error: RemoteError) -> Attempt<Blocker> {
    let class = classify(&error, CallContext::Read);
    remote_attempt(FETCH_SNAPSHOT, error, class)
}

impl<C: Clock + Clone> StateReconciler<C> {
    /// Reconciler driven by `retrier`
    pub fn with_retrier(retrier: BackoffRetrier<C>) -> Self {
        Self { retrier }
    }

    /// Fetch until `predicate` holds and return that snapshot
    ///
    /// An empty listing counts as "not there yet". The returned snapshot is
    /// the one the predicate was evaluated on.
    pub fn wait_until<S, F, P>(&self, mut fetch_fn: F, predicate: P, budget: &OperationBudget) -> Result<S>
    where
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
        P: Fn(&S) -> bool,
    {
        let span = info_span!("wait_until", op_id = %Uuid::new_v4());
        let _entered = span.enter();

        let budget = budget.or_awaiting("waiting for the resource to reach the expected state");
        let retrier = self.retrier.clone().named("wait_until");
        let mut polls = 0_u32;

        let outcome = settle(retrier.retry(&budget, || {
            polls += 1;
            match fetch_fn() {
                Ok(Some(snapshot)) if predicate(&snapshot) => Ok(snapshot),
                Ok(Some(_)) => {
                    debug!(poll = polls, "Snapshot does not match yet");
                    Err(Attempt::retry(Blocker::pending("snapshot does not match yet")))
                }
                Ok(None) => {
                    debug!(poll = polls, "Resource not listed yet");
                    Err(Attempt::retry(Blocker::pending("resource is not listed yet")))
                }
                Err(error) => Err(read_attempt(error)),
            }
        }));
        if outcome.is_ok() {
            info!(polls, "Resource reached expected state");
        }
        outcome
    }

    /// Fetch until every target field matches
    pub fn wait_for_fields<S, F>(
        &self,
        mut fetch_fn: F,
        targets: &FieldTargets,
        budget: &OperationBudget,
    ) -> Result<S>
    where
        S: FieldSource,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        let span = info_span!("wait_for_fields", op_id = %Uuid::new_v4());
        let _entered = span.enter();

        let budget = budget.or_awaiting(targets.awaiting());
        let retrier = self.retrier.clone().named("wait_for_fields");

        settle(retrier.retry(&budget, || match fetch_fn() {
            Ok(Some(snapshot)) => {
                let mismatches = targets.mismatches(&snapshot);
                if mismatches.is_empty() {
                    Ok(snapshot)
                } else {
                    let pending = mismatches.join(", ");
                    debug!(pending = %pending, "Fields not at target");
                    Err(Attempt::retry(Blocker::Pending(pending)))
                }
            }
            Ok(None) => Err(Attempt::retry(Blocker::pending("resource is not listed yet"))),
            Err(error) => Err(read_attempt(error)),
        }))
    }

    /// Fetch until the resource is no longer listed or reports itself gone
    pub fn wait_until_absent<S, F>(&self, mut fetch_fn: F, budget: &OperationBudget) -> Result<()>
    where
        S: Snapshot,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        let span = info_span!("wait_until_absent", op_id = %Uuid::new_v4());
        let _entered = span.enter();

        let budget = budget.or_awaiting("waiting for the resource to disappear");
        let retrier = self.retrier.clone().named("wait_until_absent");
        let mut polls = 0_u32;

        let outcome = settle(retrier.retry(&budget, || {
            polls += 1;
            match fetch_fn() {
                Ok(None) => Ok(()),
                Ok(Some(snapshot)) if snapshot.lifecycle() == Lifecycle::Gone => Ok(()),
                Ok(Some(snapshot)) => {
                    debug!(poll = polls, lifecycle = %snapshot.lifecycle(), "Resource still present");
                    Err(Attempt::retry(Blocker::pending("resource is still present")))
                }
                Err(error) => Err(read_attempt(error)),
            }
        }));
        if outcome.is_ok() {
            info!(polls, "Resource absence confirmed");
        }
        outcome
    }

    /// Read the resource, waiting out transitional states
    ///
    /// An empty listing or a gone snapshot is `Ok(None)`.
    pub fn describe_with_pending_filter<S, F>(
        &self,
        mut fetch_fn: F,
        budget: &OperationBudget,
    ) -> Result<Option<S>>
    where
        S: Snapshot,
        F: FnMut() -> std::result::Result<Option<S>, RemoteError>,
    {
        let span = info_span!("describe", op_id = %Uuid::new_v4());
        let _entered = span.enter();

        let budget = budget.or_awaiting("waiting for the resource to leave a transitional state");
        let retrier = self.retrier.clone().named("describe");

        settle(retrier.retry(&budget, || match fetch_fn() {
            Ok(None) => Ok(None),
            Ok(Some(snapshot)) => match snapshot.lifecycle() {
                Lifecycle::Stable => Ok(Some(snapshot)),
                Lifecycle::Gone => Ok(None),
                Lifecycle::Transitional => {
                    debug!("Resource is transitional, reading again");
                    Err(Attempt::retry(Blocker::pending("resource is in a transitional state")))
                }
            },
            Err(error) => Err(read_attempt(error)),
        }))
    }

    /// [`wait_until`](Self::wait_until) through a [`SnapshotPort`]
    pub fn wait_until_port<P, Q>(&self, port: &P, predicate: Q, budget: &OperationBudget) -> Result<P::Snapshot>
    where
        P: SnapshotPort + ?Sized,
        Q: Fn(&P::Snapshot) -> bool,
    {
        self.wait_until(|| port.fetch_snapshot(), predicate, budget)
    }
}
