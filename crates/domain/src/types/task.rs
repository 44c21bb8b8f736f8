//! Task handles and the three-way task status taxonomy

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier returned by a mutation call
///
/// Only meaningful to the status-fetch collaborator that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskHandle {
    /// Textual task or flow id
    Name(String),
    /// Numeric task or deal id
    Id(i64),
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for TaskHandle {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for TaskHandle {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<i64> for TaskHandle {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

/// Progress of an asynchronous task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Still running
    Pending,
    /// Finished successfully
    Succeeded,
    /// Terminal failure with the reason reported by the control plane
    Failed(String),
}

impl TaskStatus {
    /// Failure with `reason`
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// True for `Succeeded` and `Failed`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Raw status record as returned by task-describe APIs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskReport {
    /// Free-form status label, e.g. `"running"` or `"success"`
    pub status: String,
    /// Optional detail; carried as the failure reason when present
    pub message: Option<String>,
}

impl TaskReport {
    /// Report with a status label and no message
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into(), message: None }
    }

    /// Attach a detail message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display_and_conversions() {
        assert_eq!(TaskHandle::from("T1").to_string(), "T1");
        assert_eq!(TaskHandle::from(String::from("deal-9")), TaskHandle::Name("deal-9".into()));
        assert_eq!(TaskHandle::from(4521_i64).to_string(), "4521");
    }

    #[test]
    fn test_handle_serde_is_untagged() {
        let name: TaskHandle = serde_json::from_str("\"T1\"").unwrap();
        let id: TaskHandle = serde_json::from_str("42").unwrap();
        assert_eq!(name, TaskHandle::Name("T1".into()));
        assert_eq!(id, TaskHandle::Id(42));
    }

    #[test]
    fn test_status_terminality() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::failed("disk full").is_terminal());
        assert_eq!(TaskStatus::failed("disk full").to_string(), "failed: disk full");
    }
}
