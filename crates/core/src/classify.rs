//! Classification of collaborator failures
//!
//! A failure is classified from its code, its message and the kind of call
//! that produced it. Nothing else is consulted, so the same failure in the
//! same context always gets the same verdict.

use converge_domain::constants::{
    DEAL_NOT_FOUND_CODE, DEAL_NOT_FOUND_MESSAGE, MID_TRANSITION_CODES, NOT_YET_VISIBLE_CODES,
    PERMISSION_CODE_PREFIXES, THROTTLING_CODE_PREFIX, TRADE_ERROR_CODE, TRANSIENT_CODES,
};
use converge_domain::{ErrorClass, RemoteError};

/// The kind of call a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallContext {
    /// Plain mutation submission
    Mutation,
    /// Submission of a billed mutation
    MeteredMutation,
    /// Status query for a task or deal handle
    StatusQuery,
    /// Snapshot read
    Read,
    /// Isolation, contract termination or purge
    Destruction,
}

impl CallContext {
    /// Label used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::MeteredMutation => "metered_mutation",
            Self::StatusQuery => "status_query",
            Self::Read => "read",
            Self::Destruction => "destruction",
        }
    }
}

/// Classify `error` raised in `context`
pub fn classify(error: &RemoteError, context: CallContext) -> ErrorClass {
    if is_permission_denied(error) {
        return ErrorClass::Fatal;
    }

    match context {
        CallContext::MeteredMutation => {
            if error.has_code(TRADE_ERROR_CODE) {
                ErrorClass::RaceWindow
            } else {
                ErrorClass::Fatal
            }
        }
        CallContext::StatusQuery => {
            if is_not_yet_visible(error) {
                ErrorClass::RaceWindow
            } else if is_transient(error) {
                ErrorClass::Transient
            } else {
                ErrorClass::Fatal
            }
        }
        CallContext::Destruction => {
            if is_transient(error) || is_mid_transition(error) {
                ErrorClass::Transient
            } else {
                ErrorClass::Fatal
            }
        }
        CallContext::Mutation | CallContext::Read => {
            if is_transient(error) {
                ErrorClass::Transient
            } else {
                ErrorClass::Fatal
            }
        }
    }
}

/// No answer from the control plane, throttling, or a known transient code
pub fn is_transient(error: &RemoteError) -> bool {
    error.is_transport()
        || error.in_code_family(THROTTLING_CODE_PREFIX)
        || TRANSIENT_CODES.iter().any(|code| error.has_code(code))
}

/// The control plane accepted a mutation but cannot show its task yet
pub fn is_not_yet_visible(error: &RemoteError) -> bool {
    (error.has_code(DEAL_NOT_FOUND_CODE) && error.message_contains(DEAL_NOT_FOUND_MESSAGE))
        || NOT_YET_VISIBLE_CODES.iter().any(|code| error.has_code(code))
}

/// The resource is between states and rejects teardown for now
pub fn is_mid_transition(error: &RemoteError) -> bool {
    MID_TRANSITION_CODES.iter().any(|code| error.has_code(code))
}

/// Authentication or authorization rejection, never retried
pub fn is_permission_denied(error: &RemoteError) -> bool {
    PERMISSION_CODE_PREFIXES.iter().any(|prefix| error.in_code_family(prefix))
}
