//! Attempt outcomes shared by the reconciliation loops

use std::fmt;

use converge_common::error::CommonError;
use converge_common::resilience::{Attempt, RetryError, RetryResult};
use converge_domain::{ErrorClass, ReconcileError, RemoteError, Result};

/// Why an attempt did not finish the call
#[derive(Debug)]
pub(crate) enum Blocker {
    /// The awaited condition has not been reached yet
    Pending(String),
    /// A collaborator or terminal failure
    Error(ReconcileError),
}

impl Blocker {
    pub(crate) fn pending(message: impl Into<String>) -> Self {
        Self::Pending(message.into())
    }
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(message) => f.write_str(message),
            Self::Error(err) => write!(f, "{err}"),
        }
    }
}

impl From<ReconcileError> for Blocker {
    fn from(err: ReconcileError) -> Self {
        Self::Error(err)
    }
}

/// Wrap a collaborator failure as a retry or fatal attempt
pub(crate) fn remote_attempt(
    operation: &str,
    error: RemoteError,
    class: ErrorClass,
) -> Attempt<Blocker> {
    let wrapped = Blocker::Error(ReconcileError::remote(operation, error));
    if class.is_retryable() {
        Attempt::retry(wrapped)
    } else {
        Attempt::fatal(wrapped)
    }
}

/// Collapse a retry result into the public error type
pub(crate) fn settle<T>(result: RetryResult<T, Blocker>) -> Result<T> {
    result.map_err(|err| match err {
        RetryError::Fatal { source: Blocker::Error(err), .. } => err,
        RetryError::Fatal { source: Blocker::Pending(message), .. } => {
            CommonError::internal_with_context(message, "settle").into()
        }
        RetryError::Timeout { awaiting, elapsed, attempts, last } => ReconcileError::Timeout {
            awaiting,
            elapsed,
            attempts,
            last_error: Some(last.to_string()),
        },
    })
}
