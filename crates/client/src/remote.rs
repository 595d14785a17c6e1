//! The remote store seam used by the sync layer.

use async_trait::async_trait;
use planboard_core::project::{Project, ProjectDraft};
use planboard_core::types::ProjectId;

use crate::api::{ApiError, ProjectsApi};

/// Authoritative store of projects.
///
/// Implemented over HTTP by [`ProjectsApi`]; tests substitute an in-process
/// fake.
#[async_trait]
pub trait ProjectRemote: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ApiError>;

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ApiError>;

    async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError>;

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError>;
}

#[async_trait]
impl ProjectRemote for ProjectsApi {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.list_projects().await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.create_project(draft).await
    }

    async fn update(&self, id: &ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.update_project(id, draft).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.delete_project(id).await
    }
}
