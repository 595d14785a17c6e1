//! The single owner of the local projects collection.
//!
//! Every mutation follows the same shape: mark the operation pending, await
//! the remote call with no lock held, then merge the server response into
//! the collection as it is *now*. Concurrent operations therefore never
//! overwrite each other with a stale copy of the list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use planboard_client::{ApiError, ProjectRemote};
use planboard_core::project::{Project, ProjectDraft};
use planboard_core::types::ProjectId;
use tokio::sync::{broadcast, RwLock, RwLockWriteGuard};

use crate::bus::{EventBus, SyncEvent};
use crate::error::SyncError;
use crate::operation::{log_failure, OpPhase, Operation};

/// Owned copy of the store state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Most recently created first.
    pub projects: Vec<Project>,
    /// A load is outstanding (or has not completed yet).
    pub loading: bool,
    /// Banner text from the last failed operation.
    pub error: Option<&'static str>,
    /// Project whose deletion awaits a yes/no answer.
    pub pending_confirmation: Option<ProjectId>,
}

impl StoreSnapshot {
    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }
}

#[derive(Debug)]
struct StoreState {
    projects: Vec<Project>,
    loads_in_flight: usize,
    /// Some load has finished, successfully or not.
    settled: bool,
    error: Option<&'static str>,
    pending_confirmation: Option<ProjectId>,
    deleting: HashSet<ProjectId>,
    phases: HashMap<Operation, OpPhase>,
}

impl StoreState {
    fn loading(&self) -> bool {
        self.loads_in_flight > 0 || !self.settled
    }

    fn succeed(&mut self, op: Operation) {
        self.error = None;
        self.phases.insert(op, OpPhase::Succeeded);
    }
}

/// Remote-backed projects collection shared as `Arc<ProjectStore>`.
pub struct ProjectStore {
    remote: Arc<dyn ProjectRemote>,
    state: RwLock<StoreState>,
    bus: EventBus,
}

impl ProjectStore {
    /// Create an empty store. It reports `loading` until the first
    /// [`load`](Self::load) completes.
    pub fn new(remote: Arc<dyn ProjectRemote>) -> Self {
        Self {
            remote,
            state: RwLock::new(StoreState {
                projects: Vec::new(),
                loads_in_flight: 0,
                settled: false,
                error: None,
                pending_confirmation: None,
                deleting: HashSet::new(),
                phases: HashMap::new(),
            }),
            bus: EventBus::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.bus.subscribe()
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot {
            projects: state.projects.clone(),
            loading: state.loading(),
            error: state.error,
            pending_confirmation: state.pending_confirmation.clone(),
        }
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    pub async fn get(&self, id: &ProjectId) -> Option<Project> {
        self.state
            .read()
            .await
            .projects
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    pub async fn phase(&self, op: Operation) -> OpPhase {
        self.state
            .read()
            .await
            .phases
            .get(&op)
            .copied()
            .unwrap_or_default()
    }

    pub async fn error(&self) -> Option<&'static str> {
        self.state.read().await.error
    }

    pub async fn pending_confirmation(&self) -> Option<ProjectId> {
        self.state.read().await.pending_confirmation.clone()
    }

    /// Clear the error banner.
    pub async fn dismiss_error(&self) {
        let cleared = self.state.write().await.error.take().is_some();
        if cleared {
            self.bus.publish(SyncEvent::ErrorDismissed);
        }
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Replace the collection with the remote one.
    ///
    /// On failure the collection keeps its prior contents. `loading` stays
    /// set until every overlapping load has finished.
    pub async fn load(&self) -> Result<usize, SyncError> {
        self.begin(Operation::Load, |state| state.loads_in_flight += 1).await;
        self.bus.publish(SyncEvent::LoadStarted);

        let result = self.remote.list().await;

        let mut state = self.state.write().await;
        state.loads_in_flight -= 1;
        state.settled = true;
        match result {
            Ok(projects) => {
                let projects = dedupe_by_id(projects);
                let count = projects.len();
                state.projects = projects;
                if let Some(pending) = state.pending_confirmation.clone() {
                    if !state.projects.iter().any(|p| p.id == pending) {
                        state.pending_confirmation = None;
                    }
                }
                state.succeed(Operation::Load);
                drop(state);

                tracing::info!(count, "Loaded projects");
                self.bus.publish(SyncEvent::Loaded { count });
                Ok(count)
            }
            Err(e) => Err(self.record_failure(state, Operation::Load, e)),
        }
    }

    // -----------------------------------------------------------------------
    // Create / update
    // -----------------------------------------------------------------------

    /// Create a project and prepend the server's record.
    pub async fn create(&self, draft: &ProjectDraft) -> Result<Project, SyncError> {
        self.begin(Operation::Create, |_| {}).await;

        let result = self.remote.create(draft).await;

        let mut state = self.state.write().await;
        match result {
            Ok(project) => {
                state.projects.retain(|p| p.id != project.id);
                state.projects.insert(0, project.clone());
                state.succeed(Operation::Create);
                drop(state);

                tracing::info!(id = %project.id, name = %project.name, "Created project");
                self.bus.publish(SyncEvent::Created(project.clone()));
                Ok(project)
            }
            Err(e) => Err(self.record_failure(state, Operation::Create, e)),
        }
    }

    /// Update a project and replace it in place with the server's record.
    pub async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> Result<Project, SyncError> {
        self.begin(Operation::Update, |_| {}).await;

        let result = self.remote.update(id, draft).await;

        let mut state = self.state.write().await;
        match result {
            Ok(project) => {
                match state.projects.iter().position(|p| &p.id == id) {
                    Some(index) => {
                        state.projects[index] = project.clone();
                        let mut position = 0;
                        state.projects.retain(|p| {
                            let keep = position == index || p.id != project.id;
                            position += 1;
                            keep
                        });
                    }
                    None => {
                        tracing::warn!(id = %id, "Updated project is no longer in the local collection");
                    }
                }
                state.succeed(Operation::Update);
                drop(state);

                tracing::info!(id = %project.id, "Updated project");
                self.bus.publish(SyncEvent::Updated(project.clone()));
                Ok(project)
            }
            Err(e) => Err(self.record_failure(state, Operation::Update, e)),
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Ask for confirmation before deleting `id`. No remote call is made.
    pub async fn request_delete(&self, id: &ProjectId) -> Result<(), SyncError> {
        let mut state = self.state.write().await;
        if let Some(pending) = &state.pending_confirmation {
            return Err(SyncError::ConfirmationPending(pending.clone()));
        }
        if state.deleting.contains(id) {
            return Err(SyncError::DeleteInFlight(id.clone()));
        }
        if !state.projects.iter().any(|p| &p.id == id) {
            return Err(SyncError::UnknownProject(id.clone()));
        }
        state.pending_confirmation = Some(id.clone());
        drop(state);

        self.bus.publish(SyncEvent::ConfirmRequested(id.clone()));
        Ok(())
    }

    /// Answer "no": drop the pending deletion. Returns the declined id.
    pub async fn decline_delete(&self) -> Option<ProjectId> {
        let declined = self.state.write().await.pending_confirmation.take();
        if let Some(id) = &declined {
            self.bus.publish(SyncEvent::ConfirmDeclined(id.clone()));
        }
        declined
    }

    /// Answer "yes": delete the pending project remotely, then locally.
    pub async fn confirm_delete(&self) -> Result<ProjectId, SyncError> {
        let id = {
            let mut state = self.state.write().await;
            let id = state
                .pending_confirmation
                .take()
                .ok_or(SyncError::NoPendingConfirmation)?;
            state.deleting.insert(id.clone());
            state.phases.insert(Operation::Delete, OpPhase::Pending);
            id
        };

        let result = self.remote.delete(&id).await;

        let mut state = self.state.write().await;
        state.deleting.remove(&id);
        match result {
            Ok(()) => {
                state.projects.retain(|p| p.id != id);
                state.succeed(Operation::Delete);
                drop(state);

                tracing::info!(id = %id, "Deleted project");
                self.bus.publish(SyncEvent::Deleted(id.clone()));
                Ok(id)
            }
            Err(e) => Err(self.record_failure(state, Operation::Delete, e)),
        }
    }

    // ---- private helpers ----

    async fn begin(&self, op: Operation, prepare: impl FnOnce(&mut StoreState)) {
        let mut state = self.state.write().await;
        prepare(&mut state);
        state.phases.insert(op, OpPhase::Pending);
    }

    /// Leave the collection untouched, set the banner, log the detail.
    fn record_failure(
        &self,
        mut state: RwLockWriteGuard<'_, StoreState>,
        op: Operation,
        error: ApiError,
    ) -> SyncError {
        let message = op.failure_message();
        state.error = Some(message);
        state.phases.insert(op, OpPhase::Failed);
        drop(state);

        log_failure(op, &error);
        self.bus.publish(SyncEvent::Failed { op, message });
        SyncError::Remote { op, source: error }
    }
}

/// Keep the first record for each id.
fn dedupe_by_id(projects: Vec<Project>) -> Vec<Project> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.id.clone());
            if !fresh {
                tracing::warn!(id = %p.id, "Dropping duplicate project from list response");
            }
            fresh
        })
        .collect()
}
