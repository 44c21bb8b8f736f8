//! Collaborators used during teardown

use converge_domain::{RemoteError, Snapshot};

/// Control-plane calls needed to tear a resource down
pub trait DestructionPort {
    /// Snapshot type returned by [`fetch`](Self::fetch)
    type Snapshot: Snapshot;

    /// Current snapshot, or `None` when the resource is not listed
    fn fetch(&self) -> Result<Option<Self::Snapshot>, RemoteError>;

    /// Reversible isolation of a usage-billed resource
    fn isolate(&self) -> Result<(), RemoteError>;

    /// Early termination of a contract-billed resource
    fn terminate_contract(&self) -> Result<(), RemoteError>;

    /// Irreversible removal of an isolated resource
    fn purge(&self) -> Result<(), RemoteError>;
}
