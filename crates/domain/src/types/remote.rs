//! Errors reported by control-plane collaborators

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure returned by a collaborator call
///
/// `code == None` marks a transport-level failure: the control plane never
/// answered, so nothing is known about whether the request was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Error code, `None` for transport failures
    pub code: Option<String>,
    /// Human-readable message
    pub message: String,
    /// Request id echoed by the control plane, if any
    pub request_id: Option<String>,
}

impl RemoteError {
    /// Error answered by the control plane with a code
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: Some(code.into()), message: message.into(), request_id: None }
    }

    /// Error raised before the control plane answered
    pub fn transport(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into(), request_id: None }
    }

    /// Attach the request id the control plane echoed
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Error code, if the control plane answered
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// True when no answer was received
    pub fn is_transport(&self) -> bool {
        self.code.is_none()
    }

    /// Exact code match
    pub fn has_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }

    /// True when the code equals `family` or is a sub-code such as
    /// `family.Detail`
    pub fn in_code_family(&self, family: &str) -> bool {
        self.code().is_some_and(|code| {
            code == family
                || code.strip_prefix(family).is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Case-insensitive substring match on the message
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{code}] {}", self.message)?,
            None => write!(f, "transport error: {}", self.message)?,
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request id: {request_id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

/// Classification of a collaborator failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Retry within budget
    Transient,
    /// Accepted but not yet visible; retry only right after specific
    /// mutations
    RaceWindow,
    /// Abort and surface to the caller
    Fatal,
}

impl ErrorClass {
    /// True for every class except `Fatal`
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Fatal)
    }
}
