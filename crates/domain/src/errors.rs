//! Error types used throughout reconciliation

use std::time::Duration;

use converge_common::error::{CommonError, ErrorSeverity};
use converge_common::impl_error_classification;
use thiserror::Error;

use crate::types::{RemoteError, TaskHandle};

/// Main error type for reconciliation calls
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Collaborator failure propagated verbatim
    #[error("{operation} failed: {source}")]
    Remote {
        /// Operation that failed
        operation: String,
        /// Error as reported by the collaborator
        source: RemoteError,
    },

    /// The tracked task reached a terminal failure
    #[error("task {handle} failed: {reason}")]
    TaskFailed {
        /// Handle of the failed task
        handle: TaskHandle,
        /// Failure reason reported by the control plane
        reason: String,
    },

    /// Budget exhausted while the awaited condition was still pending
    #[error(
        "timed out after {elapsed:?} {awaiting}; the operation may still be in progress \
         ({attempts} attempts, last error: {})",
        last_error.as_deref().unwrap_or("none")
    )]
    Timeout {
        /// Condition that was still pending
        awaiting: String,
        /// Time spent before giving up
        elapsed: Duration,
        /// Attempts made
        attempts: u32,
        /// Last retryable error, if any attempt failed
        last_error: Option<String>,
    },

    /// The collaborator answered with something the caller cannot use
    #[error("unexpected response from {operation}: {message}")]
    UnexpectedResponse {
        /// Operation that answered
        operation: String,
        /// What was wrong with the answer
        message: String,
    },

    /// Local failure shared with other crates
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl_error_classification!(ReconcileError, Common,
    Self::Remote { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::TaskFailed { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::Timeout { .. } => {
        retryable: true,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::UnexpectedResponse { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    }
);

impl ReconcileError {
    /// Collaborator failure raised by `operation`
    pub fn remote(operation: impl Into<String>, source: RemoteError) -> Self {
        Self::Remote { operation: operation.into(), source }
    }

    /// Terminal task failure
    pub fn task_failed(handle: TaskHandle, reason: impl Into<String>) -> Self {
        Self::TaskFailed { handle, reason: reason.into() }
    }

    /// Unusable answer from `operation`
    pub fn unexpected(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse { operation: operation.into(), message: message.into() }
    }

    /// True when the budget ran out while the condition was pending
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True when retrying the same call cannot succeed
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Timeout { .. } => false,
            Self::Common(err) => {
                !converge_common::error::ErrorClassification::is_retryable(err)
            }
            _ => true,
        }
    }

    /// Control-plane code of a propagated collaborator error
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Remote { source, .. } => source.code(),
            _ => None,
        }
    }
}

/// Result type alias for reconciliation calls
pub type Result<T> = std::result::Result<T, ReconcileError>;
