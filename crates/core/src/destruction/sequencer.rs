//! Teardown state machine

use converge_common::resilience::{BackoffRetrier, OperationBudget};
use converge_common::testing::{Clock, SystemClock};
use converge_domain::{impl_domain_status_conversions, BillingMode, RemoteError, Result, Snapshot};
use tracing::{info, info_span};
use uuid::Uuid;

use super::ports::DestructionPort;
use crate::classify::{classify, CallContext};
use crate::outcome::{remote_attempt, settle};
use crate::state::StateReconciler;

/// Isolation budget as a multiple of the write budget
pub const ISOLATE_WRITE_MULTIPLIER: u32 = 10;

/// Verification budget as a multiple of the read budget
pub const VERIFY_READ_MULTIPLIER: u32 = 20;

/// Where a teardown has got to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DestructionState {
    /// Nothing has been issued yet
    #[default]
    Active,
    /// Isolation or contract termination was accepted
    Isolated,
    /// The purge was accepted
    Offline,
    /// The resource is confirmed gone
    Verified,
}

impl_domain_status_conversions!(DestructionState {
    Active => "active",
    Isolated => "isolated",
    Offline => "offline",
    Verified => "verified",
});

/// First teardown step, chosen from the billing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeardownPath {
    /// Usage-billed resources are isolated first
    Isolate,
    /// Contract-billed resources have their contract terminated first
    TerminateContract,
}

impl TeardownPath {
    /// Path for a resource billed with `mode`
    pub fn for_billing_mode(mode: BillingMode) -> Self {
        match mode {
            BillingMode::Prepaid => Self::TerminateContract,
            BillingMode::Postpaid | BillingMode::Unknown => Self::Isolate,
        }
    }

    /// Label used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isolate => "isolate",
            Self::TerminateContract => "terminate_contract",
        }
    }
}

/// How a successful teardown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructionOutcome {
    /// The resource was gone before any mutation was issued
    AlreadyAbsent,
    /// The resource was torn down and its absence confirmed
    Destroyed {
        /// First step taken
        path: TeardownPath,
    },
}

/// Budgets for each teardown phase
#[derive(Debug, Clone)]
pub struct DestructionBudgets {
    /// Budget for isolation or contract termination
    pub isolate: OperationBudget,
    /// Budget for the purge
    pub purge: OperationBudget,
    /// Budget for the initial read and for confirming absence
    pub verify: OperationBudget,
}

impl DestructionBudgets {
    /// Budgets given explicitly per phase
    pub fn new(isolate: OperationBudget, purge: OperationBudget, verify: OperationBudget) -> Self {
        Self { isolate, purge, verify }
    }

    /// Derive phase budgets from the resource's write and read budgets with
    /// the default multipliers
    pub fn from_base(write: &OperationBudget, read: &OperationBudget) -> Self {
        Self::with_multipliers(write, read, ISOLATE_WRITE_MULTIPLIER, VERIFY_READ_MULTIPLIER)
    }

    /// Derive phase budgets with caller-chosen multipliers
    ///
    /// Isolation gets `write * isolate_multiplier`, the purge gets `write`,
    /// and verification gets `read * verify_multiplier`.
    pub fn with_multipliers(
        write: &OperationBudget,
        read: &OperationBudget,
        isolate_multiplier: u32,
        verify_multiplier: u32,
    ) -> Self {
        Self {
            isolate: write.scaled(isolate_multiplier),
            purge: write.clone(),
            verify: read.scaled(verify_multiplier),
        }
    }
}

/// Drives one resource from `Active` to `Verified`
///
/// The initial read also uses the verify budget. The teardown path is taken
/// from that read, never from desired configuration.
#[derive(Debug, Clone)]
pub struct DestructionSequencer<C: Clock = SystemClock> {
    retrier: BackoffRetrier<C>,
    state: DestructionState,
}

impl DestructionSequencer<SystemClock> {
    /// Sequencer backed by the system clock
    pub fn new() -> Self {
        Self::with_retrier(BackoffRetrier::new())
    }
}

impl Default for DestructionSequencer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> DestructionSequencer<C> {
    /// Sequencer driven by `retrier`
    pub fn with_retrier(retrier: BackoffRetrier<C>) -> Self {
        Self { retrier, state: DestructionState::Active }
    }

    /// State reached by the latest teardown
    pub fn state(&self) -> DestructionState {
        self.state
    }

    /// Tear the resource down and confirm it is gone
    ///
    /// Every call starts again from `Active`, so one sequencer can tear down
    /// several resources in turn.
    pub fn destroy<P>(&mut self, port: &P, budgets: &DestructionBudgets) -> Result<DestructionOutcome>
    where
        P: DestructionPort + ?Sized,
    {
        let span = info_span!("destroy", op_id = %Uuid::new_v4());
        let _entered = span.enter();
        self.state = DestructionState::Active;

        let reader = StateReconciler::with_retrier(self.retrier.clone());
        let Some(snapshot) = reader.describe_with_pending_filter(|| port.fetch(), &budgets.verify)? else {
            info!("Resource already absent, nothing to destroy");
            self.transition(DestructionState::Verified);
            return Ok(DestructionOutcome::AlreadyAbsent);
        };

        let path = TeardownPath::for_billing_mode(snapshot.billing_mode());
        info!(path = path.as_str(), billing_mode = %snapshot.billing_mode(), "Starting teardown");
        match path {
            TeardownPath::Isolate => self.mutate("isolate", &budgets.isolate, || port.isolate())?,
            TeardownPath::TerminateContract => {
                self.mutate("terminate_contract", &budgets.isolate, || port.terminate_contract())?
            }
        }
        self.transition(DestructionState::Isolated);

        self.mutate("purge", &budgets.purge, || port.purge())?;
        self.transition(DestructionState::Offline);

        let verify = budgets.verify.or_awaiting("waiting for the resource to be purged");
        reader.wait_until_absent(|| port.fetch(), &verify)?;
        self.transition(DestructionState::Verified);

        Ok(DestructionOutcome::Destroyed { path })
    }

    fn mutate<F>(&self, operation: &'static str, budget: &OperationBudget, mut call: F) -> Result<()>
    where
        F: FnMut() -> std::result::Result<(), RemoteError>,
    {
        let budget = budget.or_awaiting(format!("waiting for {operation} to be accepted"));
        let retrier = self.retrier.clone().named(operation);
        settle(retrier.retry(&budget, || {
            call().map_err(|error| {
                let class = classify(&error, CallContext::Destruction);
                remote_attempt(operation, error, class)
            })
        }))
    }

    fn transition(&mut self, next: DestructionState) {
        info!(from = %self.state, to = %next, "Destruction state changed");
        self.state = next;
    }
}
