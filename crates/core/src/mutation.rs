//! Submission of mutations to the control plane

use converge_common::resilience::{BackoffRetrier, OperationBudget};
use converge_common::testing::{Clock, SystemClock};
use converge_domain::{ErrorClass, RemoteError, Result};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::classify::{classify, CallContext};
use crate::outcome::{remote_attempt, settle};
use crate::trade::{MeteredOutcome, TradeRaceTracker, TradeVerdict};

/// Submits mutations, retrying only what is safe to resend
#[derive(Debug, Clone)]
pub struct MutationSubmitter<C: Clock = SystemClock> {
    retrier: BackoffRetrier<C>,
}

impl MutationSubmitter<SystemClock> {
    /// Submitter backed by the system clock
    pub fn new() -> Self {
        Self::with_retrier(BackoffRetrier::new())
    }
}

impl Default for MutationSubmitter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> MutationSubmitter<C> {
    /// Submitter driven by `retrier`
    pub fn with_retrier(retrier: BackoffRetrier<C>) -> Self {
        Self { retrier }
    }

    /// Submit a mutation, resending it on transient failures
    ///
    /// Returns whatever the call answered with: a task handle, a deal id, or
    /// nothing when the caller will reconcile against a snapshot.
    pub fn submit<T, F>(&self, operation: &str, budget: &OperationBudget, mut submit_fn: F) -> Result<T>
    where
        F: FnMut() -> std::result::Result<T, RemoteError>,
    {
        let span = info_span!("submit_mutation", op_id = %Uuid::new_v4(), operation = %operation);
        let _entered = span.enter();

        let budget = budget.or_awaiting(format!("waiting for {operation} to be accepted"));
        let retrier = self.retrier.clone().named(operation.to_string());
        settle(retrier.retry(&budget, || {
            submit_fn().map_err(|error| {
                let class = classify(&error, CallContext::Mutation);
                remote_attempt(operation, error, class)
            })
        }))
    }

    /// Submit a billed mutation, resolving the billing commit race
    ///
    /// "Invalid trade operation" answers are retried. A following "status
    /// abnormal" answer means the mutation was accepted and yields
    /// [`MeteredOutcome::AcceptedDuringRace`]. If billing never commits within
    /// the budget the call times out; acceptance is never assumed.
    pub fn submit_metered<T, F>(
        &self,
        operation: &str,
        budget: &OperationBudget,
        mut submit_fn: F,
    ) -> Result<MeteredOutcome<T>>
    where
        F: FnMut() -> std::result::Result<T, RemoteError>,
    {
        let span = info_span!("submit_metered_mutation", op_id = %Uuid::new_v4(), operation = %operation);
        let _entered = span.enter();

        let budget = budget.or_awaiting(format!("waiting for billing to commit {operation}"));
        let retrier = self.retrier.clone().named(operation.to_string());
        let mut race = TradeRaceTracker::new();

        settle(retrier.retry(&budget, || match submit_fn() {
            Ok(response) => {
                race.resolve();
                Ok(MeteredOutcome::Completed(response))
            }
            Err(error) => match race.observe(&error) {
                TradeVerdict::Retry => {
                    debug!(
                        operation = %operation,
                        code = error.code().unwrap_or_default(),
                        "Billing not committed yet"
                    );
                    Err(remote_attempt(operation, error, ErrorClass::RaceWindow))
                }
                TradeVerdict::AcceptedAsSuccess => {
                    info!(operation = %operation, "Mutation accepted while billing committed");
                    Ok(MeteredOutcome::AcceptedDuringRace)
                }
                TradeVerdict::Fatal => Err(remote_attempt(operation, error, ErrorClass::Fatal)),
            },
        }))
    }
}
