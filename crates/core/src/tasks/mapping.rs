//! Mapping raw task statuses into `Pending | Succeeded | Failed`

use converge_domain::constants::{
    deal_status_label, DEAL_PENDING_STATUSES, DEAL_STATUS_DELIVERED, TASK_FAILURE_STATUSES,
    TASK_PENDING_STATUSES, TASK_SUCCESS_STATUSES,
};
use converge_domain::{TaskReport, TaskStatus};

/// Interpretation of one kind of raw task status
pub trait StatusMapping<S> {
    /// Classify one raw status
    fn map_status(&self, raw: &S) -> TaskStatus;
}

/// For collaborators that already report a [`TaskStatus`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapping;

impl StatusMapping<TaskStatus> for IdentityMapping {
    fn map_status(&self, raw: &TaskStatus) -> TaskStatus {
        raw.clone()
    }
}

fn label_in(label: &str, labels: &[&str]) -> bool {
    labels.iter().any(|known| known.eq_ignore_ascii_case(label.trim()))
}

/// Free-form status strings; unknown labels keep polling
///
/// The status vocabulary of task-describe APIs is not guaranteed to be
/// closed, so an unrecognised label is read as `Pending`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringStatusMapping;

impl StringStatusMapping {
    fn map_label(label: &str, message: Option<&str>) -> TaskStatus {
        if label_in(label, TASK_SUCCESS_STATUSES) {
            TaskStatus::Succeeded
        } else if label_in(label, TASK_FAILURE_STATUSES) {
            TaskStatus::Failed(message.unwrap_or(label).to_string())
        } else {
            TaskStatus::Pending
        }
    }
}

impl StatusMapping<String> for StringStatusMapping {
    fn map_status(&self, raw: &String) -> TaskStatus {
        Self::map_label(raw, None)
    }
}

impl<'a> StatusMapping<&'a str> for StringStatusMapping {
    fn map_status(&self, raw: &&'a str) -> TaskStatus {
        Self::map_label(raw, None)
    }
}

impl StatusMapping<TaskReport> for StringStatusMapping {
    fn map_status(&self, raw: &TaskReport) -> TaskStatus {
        Self::map_label(&raw.status, raw.message.as_deref())
    }
}

/// Free-form status strings from a closed vocabulary
///
/// Only the pending labels keep polling; anything else that is not a success
/// is a failure carrying the label (or message) as reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictStringStatusMapping;

impl StrictStringStatusMapping {
    fn map_label(label: &str, message: Option<&str>) -> TaskStatus {
        if label_in(label, TASK_SUCCESS_STATUSES) {
            TaskStatus::Succeeded
        } else if label_in(label, TASK_PENDING_STATUSES) {
            TaskStatus::Pending
        } else {
            TaskStatus::Failed(message.map_or_else(
                || format!("task ended with status {label}"),
                str::to_string,
            ))
        }
    }
}

impl StatusMapping<String> for StrictStringStatusMapping {
    fn map_status(&self, raw: &String) -> TaskStatus {
        Self::map_label(raw, None)
    }
}

impl<'a> StatusMapping<&'a str> for StrictStringStatusMapping {
    fn map_status(&self, raw: &&'a str) -> TaskStatus {
        Self::map_label(raw, None)
    }
}

impl StatusMapping<TaskReport> for StrictStringStatusMapping {
    fn map_status(&self, raw: &TaskReport) -> TaskStatus {
        Self::map_label(&raw.status, raw.message.as_deref())
    }
}

/// Numeric billing deal codes
#[derive(Debug, Clone, Copy, Default)]
pub struct DealStatusMapping;

impl StatusMapping<i64> for DealStatusMapping {
    fn map_status(&self, raw: &i64) -> TaskStatus {
        if *raw == DEAL_STATUS_DELIVERED {
            TaskStatus::Succeeded
        } else if DEAL_PENDING_STATUSES.contains(raw) {
            TaskStatus::Pending
        } else {
            TaskStatus::Failed(format!("deal status {raw}: {}", deal_status_label(*raw)))
        }
    }
}
