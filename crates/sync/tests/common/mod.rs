//! Scriptable in-process remote store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use planboard_client::{ApiError, ProjectRemote};
use planboard_core::project::{Project, ProjectDraft, ProjectStatus};
use planboard_core::types::ProjectId;
use planboard_sync::Operation;
use tokio::sync::Semaphore;

/// A call as received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(ProjectDraft),
    Update(ProjectId, ProjectDraft),
    Delete(ProjectId),
}

#[derive(Default)]
struct Inner {
    projects: Vec<Project>,
    next_id: u64,
    failing: HashSet<Operation>,
    calls: Vec<Call>,
}

/// Remote store that keeps records in memory and normalises them the way a
/// real server would: empty descriptions come back as `null`.
#[derive(Default)]
pub struct FakeRemote {
    inner: Mutex<Inner>,
    gate: Option<Semaphore>,
    waiting: AtomicUsize,
}

impl FakeRemote {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let remote = Self::default();
        remote.inner.lock().unwrap().projects = projects;
        remote
    }

    /// Every call waits for a permit from [`release`](Self::release).
    pub fn gated() -> Self {
        Self {
            inner: Mutex::default(),
            gate: Some(Semaphore::new(0)),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    /// Make subsequent calls of `op` fail with HTTP 500.
    pub fn fail(&self, op: Operation) {
        self.inner.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: Operation) {
        self.inner.lock().unwrap().failing.remove(&op);
    }

    /// Server-side insert that bypasses the store.
    pub fn insert(&self, project: Project) {
        self.inner.lock().unwrap().projects.push(project);
    }

    /// Server-side removal that bypasses the store.
    pub fn remove(&self, id: &ProjectId) {
        self.inner.lock().unwrap().projects.retain(|p| &p.id != id);
    }

    /// Wait until `calls` requests are parked at the gate. The gate is
    /// fair, so requests are released in the order they arrived.
    pub async fn until_waiting(&self, calls: usize) {
        while self.waiting.load(Ordering::SeqCst) < calls {
            tokio::task::yield_now().await;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    async fn enter(&self, op: Operation, call: Call) -> Result<(), ApiError> {
        if let Some(gate) = &self.gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            gate.acquire().await.expect("gate closed").forget();
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if inner.failing.contains(&op) {
            return Err(ApiError::Status {
                status: 500,
                body: format!("{op} exploded"),
            });
        }
        Ok(())
    }
}

fn canonical(id: ProjectId, draft: &ProjectDraft) -> Project {
    Project {
        id,
        name: draft.name.clone(),
        description: Some(draft.description.clone()).filter(|d| !d.is_empty()),
        due_date: draft.due_date,
        status: draft.status,
    }
}

#[async_trait]
impl ProjectRemote for FakeRemote {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.enter(Operation::Load, Call::List).await?;
        Ok(self.inner.lock().unwrap().projects.clone())
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter(Operation::Create, Call::Create(draft.clone())).await?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let project = canonical(ProjectId::from(format!("srv-{}", inner.next_id)), draft);
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.enter(Operation::Update, Call::Update(id.clone(), draft.clone()))
            .await?;
        let mut inner = self.inner.lock().unwrap();
        let project = canonical(id.clone(), draft);
        match inner.projects.iter_mut().find(|p| &p.id == id) {
            Some(existing) => *existing = project.clone(),
            None => {
                return Err(ApiError::Status {
                    status: 404,
                    body: "Project not found".into(),
                })
            }
        }
        Ok(project)
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.enter(Operation::Delete, Call::Delete(id.clone())).await?;
        self.inner.lock().unwrap().projects.retain(|p| &p.id != id);
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: ProjectId::from(id),
        name: name.to_string(),
        description: None,
        due_date: date(2024, 1, 1),
        status: ProjectStatus::Active,
    }
}
