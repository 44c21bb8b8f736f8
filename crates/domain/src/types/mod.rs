//! Domain types shared by the reconciliation core and its callers

pub mod remote;
pub mod resource;
pub mod task;

pub use remote::{ErrorClass, RemoteError};
pub use resource::{BillingMode, FieldSource, Lifecycle, ResourceSnapshot, Snapshot};
pub use task::{TaskHandle, TaskReport, TaskStatus};
