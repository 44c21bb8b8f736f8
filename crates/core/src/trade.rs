//! Race between a billed mutation and its billing commit
//!
//! While the billing side of a metered mutation is still committing, the
//! control plane answers with an "invalid trade operation" error. Once billing
//! commits the resource turns mid-transition and the answer becomes "status
//! abnormal". Only that second error, seen after the first, means the
//! mutation was accepted.
//!
//! ```text
//! NoTradeErrorSeen --trade error--> TradeErrorSeen --status abnormal--> Resolved
//!        |                               |   ^
//!        |                               +---+ trade error
//!        +--status abnormal / other--> Fatal
//! ```

use converge_domain::constants::{STATUS_ABNORMAL_CODE, TRADE_ERROR_CODE};
use converge_domain::RemoteError;

/// Verdict for one error observed during the race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeVerdict {
    /// Billing not committed yet; submit again
    Retry,
    /// The mutation was accepted; stop without a response body
    AcceptedAsSuccess,
    /// Not part of the race; propagate
    Fatal,
}

/// Pure classification of a single error
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeRaceClassifier;

impl TradeRaceClassifier {
    /// Verdict for `error`, given whether a trade error was seen earlier in
    /// the same loop
    pub fn classify(error: &RemoteError, previously_saw_trade_error: bool) -> TradeVerdict {
        if error.has_code(TRADE_ERROR_CODE) {
            TradeVerdict::Retry
        } else if error.has_code(STATUS_ABNORMAL_CODE) && previously_saw_trade_error {
            TradeVerdict::AcceptedAsSuccess
        } else {
            TradeVerdict::Fatal
        }
    }
}

/// Progress through the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeRaceState {
    /// No trade error observed yet
    #[default]
    NoTradeErrorSeen,
    /// At least one trade error observed; billing is still committing
    TradeErrorSeen,
    /// The submission was answered or inferred accepted
    Resolved,
}

/// Stateful wrapper around [`TradeRaceClassifier`] for one submission loop
#[derive(Debug, Clone, Default)]
pub struct TradeRaceTracker {
    state: TradeRaceState,
}

impl TradeRaceTracker {
    /// Tracker in the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current race state
    pub fn state(&self) -> TradeRaceState {
        self.state
    }

    /// Feed the next error and advance the state machine
    ///
    /// After the race is resolved every observation is fatal.
    pub fn observe(&mut self, error: &RemoteError) -> TradeVerdict {
        if self.state == TradeRaceState::Resolved {
            return TradeVerdict::Fatal;
        }

        let verdict = TradeRaceClassifier::classify(
            error,
            self.state == TradeRaceState::TradeErrorSeen,
        );
        match verdict {
            TradeVerdict::Retry => self.state = TradeRaceState::TradeErrorSeen,
            TradeVerdict::AcceptedAsSuccess => self.state = TradeRaceState::Resolved,
            TradeVerdict::Fatal => {}
        }
        verdict
    }

    /// Record that the submission returned a response
    pub fn resolve(&mut self) {
        self.state = TradeRaceState::Resolved;
    }
}

/// Result of a metered submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeteredOutcome<T> {
    /// The call returned a response, e.g. a deal id
    Completed(T),
    /// Acceptance was inferred from the error sequence; no response body
    AcceptedDuringRace,
}

impl<T> MeteredOutcome<T> {
    /// Response body, if the call returned one
    pub fn into_response(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::AcceptedDuringRace => None,
        }
    }

    /// True when acceptance was inferred rather than answered
    pub fn was_inferred(&self) -> bool {
        matches!(self, Self::AcceptedDuringRace)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for trade.
    use super::*;

    fn trade() -> RemoteError {
        RemoteError::new(TRADE_ERROR_CODE, "trade operation invalid")
    }

    fn abnormal() -> RemoteError {
        RemoteError::new(STATUS_ABNORMAL_CODE, "instance status abnormal")
    }

    /// Validates the pure classifier table.
    ///
    /// Assertions:
    /// - Confirms the trade error always retries.
    /// - Confirms status-abnormal needs a preceding trade error.
    /// - Confirms other codes are fatal.
    #[test]
    fn test_classifier_table() {
        assert_eq!(TradeRaceClassifier::classify(&trade(), false), TradeVerdict::Retry);
        assert_eq!(TradeRaceClassifier::classify(&trade(), true), TradeVerdict::Retry);
        assert_eq!(TradeRaceClassifier::classify(&abnormal(), false), TradeVerdict::Fatal);
        assert_eq!(
            TradeRaceClassifier::classify(&abnormal(), true),
            TradeVerdict::AcceptedAsSuccess
        );
        let other = RemoteError::new("InternalError", "x");
        assert_eq!(TradeRaceClassifier::classify(&other, true), TradeVerdict::Fatal);
        assert_eq!(
            TradeRaceClassifier::classify(&RemoteError::transport("eof"), true),
            TradeVerdict::Fatal
        );
    }

    /// Validates [trade, abnormal] resolves as success.
    ///
    /// Assertions:
    /// - Confirms the verdict sequence and final `Resolved` state.
    #[test]
    fn test_trade_then_abnormal() {
        let mut tracker = TradeRaceTracker::new();
        assert_eq!(tracker.observe(&trade()), TradeVerdict::Retry);
        assert_eq!(tracker.state(), TradeRaceState::TradeErrorSeen);
        assert_eq!(tracker.observe(&abnormal()), TradeVerdict::AcceptedAsSuccess);
        assert_eq!(tracker.state(), TradeRaceState::Resolved);
    }

    /// Validates [abnormal] alone is fatal.
    ///
    /// Assertions:
    /// - Confirms the verdict is fatal and the state unchanged.
    #[test]
    fn test_abnormal_alone_is_fatal() {
        let mut tracker = TradeRaceTracker::new();
        assert_eq!(tracker.observe(&abnormal()), TradeVerdict::Fatal);
        assert_eq!(tracker.state(), TradeRaceState::NoTradeErrorSeen);
    }

    /// Validates the machine never re-enters after resolution.
    ///
    /// Assertions:
    /// - Confirms a trade error after `Resolved` is fatal.
    #[test]
    fn test_resolved_is_final() {
        let mut tracker = TradeRaceTracker::new();
        tracker.observe(&trade());
        tracker.observe(&abnormal());
        assert_eq!(tracker.observe(&trade()), TradeVerdict::Fatal);

        let mut completed = TradeRaceTracker::new();
        completed.resolve();
        assert_eq!(completed.observe(&abnormal()), TradeVerdict::Fatal);
    }

    /// Validates `MeteredOutcome` helpers.
    ///
    /// Assertions:
    /// - Confirms the response is exposed only for completed calls.
    #[test]
    fn test_metered_outcome() {
        assert_eq!(MeteredOutcome::Completed("deal-1").into_response(), Some("deal-1"));
        let inferred: MeteredOutcome<&str> = MeteredOutcome::AcceptedDuringRace;
        assert!(inferred.was_inferred());
        assert_eq!(inferred.into_response(), None);
    }
}
