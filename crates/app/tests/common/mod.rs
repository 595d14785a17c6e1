//! In-process remote store and coordinator fixtures.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use planboard_app::coordinator::Coordinator;
use planboard_client::{ApiError, ProjectRemote};
use planboard_core::project::{Project, ProjectDraft, ProjectStatus, DEFAULT_DISPLAY_FORMAT};
use planboard_core::types::ProjectId;
use planboard_sync::{Operation, ProjectStore};

#[derive(Default)]
struct Inner {
    projects: Vec<Project>,
    next_id: u64,
    failing: HashSet<Operation>,
    remote_calls: usize,
}

/// Remote store kept in memory, with per-operation failure switches.
#[derive(Default)]
pub struct FakeRemote {
    inner: Mutex<Inner>,
}

impl FakeRemote {
    pub fn fail(&self, op: Operation) {
        self.inner.lock().unwrap().failing.insert(op);
    }

    pub fn remote_calls(&self) -> usize {
        self.inner.lock().unwrap().remote_calls
    }

    fn enter(&self, op: Operation) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.remote_calls += 1;
        if inner.failing.contains(&op) {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRemote for FakeRemote {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.enter(Operation::Load)?;
        Ok(self.inner.lock().unwrap().projects.clone())
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter(Operation::Create)?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let project = Project {
            id: ProjectId::from(format!("id-{}", inner.next_id)),
            name: draft.name.clone(),
            description: Some(draft.description.clone()),
            due_date: draft.due_date,
            status: draft.status,
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter(Operation::Update)?;
        let mut inner = self.inner.lock().unwrap();
        let existing = inner
            .projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: "Project not found".into(),
            })?;
        existing.name = draft.name.clone();
        existing.description = Some(draft.description.clone());
        existing.due_date = draft.due_date;
        existing.status = draft.status;
        Ok(existing.clone())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.enter(Operation::Delete)?;
        self.inner.lock().unwrap().projects.retain(|p| &p.id != id);
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A coordinator over a fresh fake whose initial load has completed.
pub async fn started() -> (Coordinator, Arc<FakeRemote>) {
    let remote = Arc::new(FakeRemote::default());
    let store = Arc::new(ProjectStore::new(remote.clone()));
    let mut coordinator = Coordinator::new(store, DEFAULT_DISPLAY_FORMAT);
    let completion = coordinator.start().await;
    coordinator.complete(completion);
    (coordinator, remote)
}

pub async fn names(coordinator: &Coordinator) -> Vec<String> {
    coordinator
        .store()
        .projects()
        .await
        .into_iter()
        .map(|p| p.name)
        .collect()
}

pub fn status(value: &str) -> ProjectStatus {
    value.parse().unwrap()
}
