//! Control-plane constants
//!
//! Error codes, status labels and the read-only lookup tables built from
//! them. Tables are initialised once on first use and never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::{BillingMode, Lifecycle};

// Metered mutation race
/// Billing has not committed the mutation yet
pub const TRADE_ERROR_CODE: &str = "InvalidParameterValue.InvalidTradeOperation";
/// Resource is mid-transition; after a trade error it means acceptance
pub const STATUS_ABNORMAL_CODE: &str = "InvalidParameterValue.StatusAbnormal";

// Task or deal accepted but not yet visible to status queries
/// Code answered for a deal id billing cannot show yet
pub const DEAL_NOT_FOUND_CODE: &str = "InvalidParameter";
/// Message that tells a missing deal apart from other invalid parameters
pub const DEAL_NOT_FOUND_MESSAGE: &str = "deal resource not found";
/// Codes answered for a task id the status API cannot show yet
pub const NOT_YET_VISIBLE_CODES: &[&str] = &[
    "ResourceNotFound.TaskNotFound",
    "InvalidParameter.TaskNotFound",
    "ResourceNotFound.FlowNotFound",
];

// Codes worth another attempt in any context
/// Code family for throttled requests
pub const THROTTLING_CODE_PREFIX: &str = "RequestLimitExceeded";
/// Exact codes that clear up on their own
pub const TRANSIENT_CODES: &[&str] = &[
    "ClientError.NetworkError",
    "ClientError.HttpStatusCodeError",
    "InternalError",
    "TradeUnknownError",
    "ResourceInUse",
    "ResourceUnavailable",
    "ResourceInsufficient",
    "ResourceBusy",
];

/// Teardown rejected because the resource is between states
pub const MID_TRANSITION_CODES: &[&str] = &[
    "OperationDenied.InstanceStatusError",
    "ResourceInUse",
    "FailedOperation.OperationInProgress",
    STATUS_ABNORMAL_CODE,
];

/// Code families never retried, whatever the context
pub const PERMISSION_CODE_PREFIXES: &[&str] = &["AuthFailure", "UnauthorizedOperation"];

// Free-form task status labels, compared case-insensitively
/// Labels for a task still running
pub const TASK_PENDING_STATUSES: &[&str] = &["initial", "running", "paused", "waiting", "pending"];
/// Labels for a task that succeeded
pub const TASK_SUCCESS_STATUSES: &[&str] = &["success", "succeeded"];
/// Labels for a task that failed
pub const TASK_FAILURE_STATUSES: &[&str] = &["failed", "failure", "error"];

/// Deal status code for a delivered deal
pub const DEAL_STATUS_DELIVERED: i64 = 4;
/// Deal status codes still in progress
pub const DEAL_PENDING_STATUSES: &[i64] = &[1, 2, 3, 12];

/// Human-readable label for each billing deal status code
pub static DEAL_STATUS_LABELS: Lazy<HashMap<i64, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "unpaid"),
        (2, "paid, awaiting delivery"),
        (3, "delivering"),
        (4, "delivered"),
        (5, "delivery failed"),
        (6, "refunded"),
        (7, "order closed"),
        (8, "order expired before payment"),
        (9, "order invalidated"),
        (10, "product invalidated"),
        (11, "awaiting third-party payment"),
        (12, "payment in progress"),
    ])
});

/// Lifecycle phase for each known resource status label or numeric code
pub static STATUS_LIFECYCLE: Lazy<HashMap<&'static str, Lifecycle>> = Lazy::new(|| {
    HashMap::from([
        ("0", Lifecycle::Transitional),
        ("1", Lifecycle::Transitional),
        ("2", Lifecycle::Stable),
        ("-2", Lifecycle::Gone),
        ("-3", Lifecycle::Stable),
        ("initial", Lifecycle::Transitional),
        ("initializing", Lifecycle::Transitional),
        ("creating", Lifecycle::Transitional),
        ("processing", Lifecycle::Transitional),
        ("isolating", Lifecycle::Transitional),
        ("deleting", Lifecycle::Transitional),
        ("running", Lifecycle::Stable),
        ("isolated", Lifecycle::Stable),
        ("expired", Lifecycle::Gone),
        ("not_found", Lifecycle::Gone),
        ("deleted", Lifecycle::Gone),
        ("offline", Lifecycle::Gone),
    ])
});

/// Billing mode for each known charge-type label or pay-mode code
pub static BILLING_MODES: Lazy<HashMap<&'static str, BillingMode>> = Lazy::new(|| {
    HashMap::from([
        ("prepaid", BillingMode::Prepaid),
        ("1", BillingMode::Prepaid),
        ("postpaid", BillingMode::Postpaid),
        ("postpaid_by_hour", BillingMode::Postpaid),
        ("0", BillingMode::Postpaid),
    ])
});

/// Lifecycle of a status label; unknown labels are treated as stable
pub fn lifecycle_for_status(status: &str) -> Lifecycle {
    STATUS_LIFECYCLE.get(status.trim().to_lowercase().as_str()).copied().unwrap_or(Lifecycle::Stable)
}

/// Billing mode of a charge-type label or pay-mode code
pub fn billing_mode_for_code(code: &str) -> BillingMode {
    BILLING_MODES.get(code.trim().to_lowercase().as_str()).copied().unwrap_or(BillingMode::Unknown)
}

/// Label for a deal status code
pub fn deal_status_label(code: i64) -> &'static str {
    DEAL_STATUS_LABELS.get(&code).copied().unwrap_or("unknown deal status")
}
