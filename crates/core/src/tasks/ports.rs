//! Port for task status lookups

use converge_domain::{RemoteError, TaskHandle};

/// Collaborator that reports the raw status of a task handle
///
/// Any `Fn(&TaskHandle) -> Result<S, RemoteError>` closure implements it.
pub trait TaskStatusPort<S> {
    /// Fetch the current raw status of `handle`
    fn fetch_status(&self, handle: &TaskHandle) -> Result<S, RemoteError>;
}

impl<S, F> TaskStatusPort<S> for F
where
    F: Fn(&TaskHandle) -> Result<S, RemoteError>,
{
    fn fetch_status(&self, handle: &TaskHandle) -> Result<S, RemoteError> {
        self(handle)
    }
}
