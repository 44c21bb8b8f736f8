//! Port for snapshot reads

use converge_domain::RemoteError;

/// Collaborator that fetches the current representation of one resource
///
/// `Ok(None)` means the listing came back empty.
pub trait SnapshotPort {
    /// Representation returned by a read
    type Snapshot;

    /// Read the resource once
    fn fetch_snapshot(&self) -> Result<Option<Self::Snapshot>, RemoteError>;
}
