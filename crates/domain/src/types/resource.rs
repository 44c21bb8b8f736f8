//! Remote resource snapshots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{billing_mode_for_code, lifecycle_for_status};
use crate::impl_domain_status_conversions;

/// Coarse lifecycle phase of a fetched resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Safe to hand to callers
    Stable,
    /// Mid-transition; reads should be retried
    Transitional,
    /// Expired, purged, or otherwise no longer present
    Gone,
}

impl_domain_status_conversions!(Lifecycle {
    Stable => "stable",
    Transitional => "transitional",
    Gone => "gone",
});

/// How a resource is billed; fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingMode {
    /// Contract billing; teardown terminates the contract
    Prepaid,
    /// Usage billing; teardown isolates the resource
    Postpaid,
    /// Not reported; teardown isolates the resource
    #[default]
    Unknown,
}

impl_domain_status_conversions!(BillingMode {
    Prepaid => "prepaid",
    Postpaid => "postpaid",
    Unknown => "unknown",
});

/// A freshly fetched representation of a remote resource
pub trait Snapshot {
    /// Lifecycle phase derived from the snapshot's status
    fn lifecycle(&self) -> Lifecycle;

    /// Billing mode, `Unknown` unless the snapshot reports one
    fn billing_mode(&self) -> BillingMode {
        BillingMode::Unknown
    }
}

/// Access to named numeric fields of a snapshot
pub trait FieldSource {
    /// Value of `name`, or `None` when the snapshot lacks it
    fn field(&self, name: &str) -> Option<i64>;
}

/// General-purpose snapshot for callers without their own type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Resource id
    pub id: String,
    /// Raw status label
    pub status: String,
    /// Billing mode, `Unknown` when absent from the payload
    #[serde(default)]
    pub billing_mode: BillingMode,
    /// Named numeric fields such as memory or volume
    #[serde(default)]
    pub fields: BTreeMap<String, i64>,
}

impl ResourceSnapshot {
    /// Snapshot with an id and status and nothing else
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self { id: id.into(), status: status.into(), ..Self::default() }
    }

    /// Set the billing mode
    #[must_use]
    pub fn with_billing_mode(mut self, billing_mode: BillingMode) -> Self {
        self.billing_mode = billing_mode;
        self
    }

    /// Set billing mode from a control-plane charge-type label
    #[must_use]
    pub fn with_charge_type(self, charge_type: &str) -> Self {
        self.with_billing_mode(billing_mode_for_code(charge_type))
    }

    /// Set a named numeric field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

impl Snapshot for ResourceSnapshot {
    fn lifecycle(&self) -> Lifecycle {
        lifecycle_for_status(&self.status)
    }

    fn billing_mode(&self) -> BillingMode {
        self.billing_mode
    }
}

impl FieldSource for ResourceSnapshot {
    fn field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).copied()
    }
}
