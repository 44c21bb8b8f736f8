//! Scripted control plane implementing the core ports

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use converge_core::{DestructionPort, SnapshotPort, TaskStatusPort};
use converge_domain::{RemoteError, ResourceSnapshot, TaskHandle};

type Queue<T> = Arc<Mutex<VecDeque<Result<T, RemoteError>>>>;

/// In-memory control plane answering from pre-loaded queues.
///
/// When a queue runs dry the last answer is repeated, so "stays running
/// forever" needs a single entry. Every call is recorded by name.
#[derive(Default, Clone)]
pub struct ScriptedControlPlane {
    statuses: Queue<String>,
    snapshots: Queue<Option<ResourceSnapshot>>,
    mutations: Queue<()>,
    calls: Arc<Mutex<Vec<String>>>,
}

fn next<T: Clone>(queue: &Queue<T>) -> Result<T, RemoteError> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue.front().cloned().unwrap_or_else(|| Err(RemoteError::new("InternalError", "script exhausted")))
    }
}

impl ScriptedControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue task status labels in answer order.
    pub fn with_statuses(self, statuses: &[&str]) -> Self {
        self.statuses.lock().unwrap().extend(statuses.iter().map(|s| Ok(s.to_string())));
        self
    }

    /// Queue snapshot answers in order; `None` is an empty listing.
    pub fn with_snapshots(self, snapshots: Vec<Option<ResourceSnapshot>>) -> Self {
        self.snapshots.lock().unwrap().extend(snapshots.into_iter().map(Ok));
        self
    }

    /// Queue a failed snapshot read at the current position.
    pub fn with_snapshot_error(self, error: RemoteError) -> Self {
        self.snapshots.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue answers shared by isolate, terminate and purge; once used up
    /// every mutation succeeds.
    pub fn with_mutation_answers(self, answers: Vec<Result<(), RemoteError>>) -> Self {
        self.mutations.lock().unwrap().extend(answers);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| *call == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn mutation(&self, name: &str) -> Result<(), RemoteError> {
        self.record(name);
        self.mutations.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

impl TaskStatusPort<String> for ScriptedControlPlane {
    fn fetch_status(&self, _handle: &TaskHandle) -> Result<String, RemoteError> {
        self.record("fetch_status");
        next(&self.statuses)
    }
}

impl SnapshotPort for ScriptedControlPlane {
    type Snapshot = ResourceSnapshot;

    fn fetch_snapshot(&self) -> Result<Option<ResourceSnapshot>, RemoteError> {
        self.record("fetch_snapshot");
        next(&self.snapshots)
    }
}

impl DestructionPort for ScriptedControlPlane {
    type Snapshot = ResourceSnapshot;

    fn fetch(&self) -> Result<Option<ResourceSnapshot>, RemoteError> {
        self.fetch_snapshot()
    }

    fn isolate(&self) -> Result<(), RemoteError> {
        self.mutation("isolate")
    }

    fn terminate_contract(&self) -> Result<(), RemoteError> {
        self.mutation("terminate_contract")
    }

    fn purge(&self) -> Result<(), RemoteError> {
        self.mutation("purge")
    }
}
