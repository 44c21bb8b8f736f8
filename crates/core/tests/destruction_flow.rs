//! Teardown flows against a scripted control plane.

mod support;

use std::time::Duration;

use converge_common::resilience::OperationBudget;
use converge_common::testing::MockClock;
use converge_core::{DestructionBudgets, DestructionOutcome, Reconciler, TeardownPath};
use converge_domain::{ReconcileError, RemoteError, ResourceSnapshot};
use support::ScriptedControlPlane;

fn budgets() -> DestructionBudgets {
    let write = OperationBudget::fixed(Duration::from_secs(60), Duration::from_secs(5));
    let read = OperationBudget::fixed(Duration::from_secs(10), Duration::from_secs(5));
    DestructionBudgets::from_base(&write, &read)
}

fn hourly() -> Option<ResourceSnapshot> {
    Some(ResourceSnapshot::new("cmgo-1", "running").with_charge_type("POSTPAID_BY_HOUR"))
}

/// Validates success only after an absent observation.
///
/// Assertions:
/// - Confirms that for several `k`, `k` present polls after the purge are
///   followed by exactly one absent poll before success.
#[test]
fn test_present_then_absent() {
    for k in 0..4_usize {
        let clock = MockClock::new();
        let reconciler = Reconciler::with_clock(clock.clone());
        let mut script = vec![hourly()];
        script.extend(std::iter::repeat(hourly()).take(k));
        script.push(None);
        let plane = ScriptedControlPlane::new().with_snapshots(script);

        let outcome = reconciler.destroy(&plane, &budgets()).unwrap();

        assert_eq!(outcome, DestructionOutcome::Destroyed { path: TeardownPath::Isolate });
        assert_eq!(plane.count("fetch_snapshot"), k + 2);
        assert_eq!(clock.sleep_count(), k);
    }
}

/// Validates a resource that stays listed ends in a timeout.
///
/// Assertions:
/// - Confirms `Timeout` names the purge wait and is not fatal.
#[test]
fn test_present_for_whole_budget() {
    let reconciler = Reconciler::with_clock(MockClock::new());
    let plane = ScriptedControlPlane::new().with_snapshots(vec![hourly()]);

    let err = reconciler.destroy(&plane, &budgets()).unwrap_err();

    match &err {
        ReconcileError::Timeout { awaiting, .. } => {
            assert_eq!(awaiting, "waiting for the resource to be purged");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!err.is_fatal());
}

/// Validates the contract path and mid-transition retries.
///
/// Assertions:
/// - Confirms a prepaid resource terminates its contract.
/// - Confirms an "operation in progress" rejection is retried.
#[test]
fn test_prepaid_contract_termination() {
    let reconciler = Reconciler::with_clock(MockClock::new());
    let plane = ScriptedControlPlane::new()
        .with_snapshots(vec![Some(ResourceSnapshot::new("cmgo-2", "running").with_charge_type("PREPAID")), None])
        .with_mutation_answers(vec![Err(RemoteError::new("FailedOperation.OperationInProgress", "busy"))]);

    let outcome = reconciler.destroy(&plane, &budgets()).unwrap();

    assert_eq!(outcome, DestructionOutcome::Destroyed { path: TeardownPath::TerminateContract });
    assert_eq!(plane.count("terminate_contract"), 2);
    assert_eq!(plane.count("isolate"), 0);
    assert_eq!(plane.count("purge"), 1);
}

/// Validates a resource already gone is left alone.
///
/// Assertions:
/// - Confirms `AlreadyAbsent` for an expired snapshot with no mutation.
#[test]
fn test_expired_resource_is_already_absent() {
    let reconciler = Reconciler::with_clock(MockClock::new());
    let plane =
        ScriptedControlPlane::new().with_snapshots(vec![Some(ResourceSnapshot::new("cmgo-3", "expired"))]);

    assert_eq!(reconciler.destroy(&plane, &budgets()).unwrap(), DestructionOutcome::AlreadyAbsent);
    assert_eq!(plane.calls(), vec!["fetch_snapshot".to_string()]);
}

/// Validates an outright rejection of isolation.
///
/// Assertions:
/// - Confirms a contractual lock code propagates verbatim and nothing is
///   purged.
#[test]
fn test_isolation_rejected() {
    let reconciler = Reconciler::with_clock(MockClock::new());
    let plane = ScriptedControlPlane::new()
        .with_snapshots(vec![hourly()])
        .with_mutation_answers(vec![Err(RemoteError::new("OperationDenied.PrepaidNotExpired", "locked"))]);

    let err = reconciler.destroy(&plane, &budgets()).unwrap_err();

    assert_eq!(err.remote_code(), Some("OperationDenied.PrepaidNotExpired"));
    assert_eq!(plane.count("purge"), 0);
}
