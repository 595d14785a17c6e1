//! Root coordinator: which forms are open, what is being edited, and how
//! finished remote operations change that.
//!
//! The coordinator owns no collection. Remote work is handed out as
//! `'static` futures ([`PendingOp`]) so the event loop can run them in the
//! background and feed each [`Completion`] back through
//! [`Coordinator::complete`].

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use planboard_core::error::CoreError;
use planboard_core::form::{FormEdit, FormField, ProjectForm};
use planboard_core::project::Project;
use planboard_core::types::ProjectId;
use planboard_sync::{ProjectStore, SyncError};

use crate::error::{AppError, AppResult};
use crate::view::{self, ViewModel};

/// Which of the two forms an action addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit,
}

impl fmt::Display for FormTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormTarget::Create => f.write_str("create"),
            FormTarget::Edit => f.write_str("edit"),
        }
    }
}

/// Outcome of a remote operation started by the coordinator.
#[derive(Debug)]
pub enum Completion {
    Loaded(Result<usize, SyncError>),
    Created(Result<Project, SyncError>),
    Updated {
        id: ProjectId,
        result: Result<Project, SyncError>,
    },
    Deleted(Result<ProjectId, SyncError>),
}

/// A remote operation ready to be spawned.
pub type PendingOp = BoxFuture<'static, Completion>;

pub struct Coordinator {
    store: Arc<ProjectStore>,
    create_form: Option<ProjectForm>,
    edit_form: Option<ProjectForm>,
    /// Latest locally raised message; remote failures live in the store.
    notice: Option<String>,
    date_format: String,
}

impl Coordinator {
    pub fn new(store: Arc<ProjectStore>, date_format: impl Into<String>) -> Self {
        Self {
            store,
            create_form: None,
            edit_form: None,
            notice: None,
            date_format: date_format.into(),
        }
    }

    pub fn store(&self) -> &Arc<ProjectStore> {
        &self.store
    }

    /// Initial load of the collection.
    pub fn start(&self) -> PendingOp {
        self.reload()
    }

    pub fn reload(&self) -> PendingOp {
        let store = Arc::clone(&self.store);
        async move { Completion::Loaded(store.load().await) }.boxed()
    }

    // -----------------------------------------------------------------------
    // Forms
    // -----------------------------------------------------------------------

    pub fn form(&self, target: FormTarget) -> Option<&ProjectForm> {
        match target {
            FormTarget::Create => self.create_form.as_ref(),
            FormTarget::Edit => self.edit_form.as_ref(),
        }
    }

    fn form_mut(&mut self, target: FormTarget) -> AppResult<&mut ProjectForm> {
        let form = match target {
            FormTarget::Create => self.create_form.as_mut(),
            FormTarget::Edit => self.edit_form.as_mut(),
        };
        form.ok_or(AppError::NoForm(target))
    }

    /// The explicit target, else the edit form when one is open.
    pub fn default_target(&self, target: Option<FormTarget>) -> FormTarget {
        target.unwrap_or(if self.edit_form.is_some() {
            FormTarget::Edit
        } else {
            FormTarget::Create
        })
    }

    /// Show the create form. An already open one keeps its values.
    pub fn open_create_form(&mut self) {
        self.create_form.get_or_insert_with(ProjectForm::new);
    }

    pub fn cancel_create(&mut self) -> AppResult<()> {
        self.create_form
            .take()
            .ok_or(AppError::NoForm(FormTarget::Create))?
            .cancel();
        Ok(())
    }

    /// Edit `id`. An open edit form is re-seeded, which discards its
    /// unsaved values when the project differs.
    pub async fn open_edit_form(&mut self, id: &ProjectId) -> AppResult<()> {
        let project = self.store.get(id).await.ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;
        match &mut self.edit_form {
            Some(form) => form.reseed(Some(&project)),
            None => self.edit_form = Some(ProjectForm::for_project(&project)),
        }
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> AppResult<()> {
        self.edit_form
            .take()
            .ok_or(AppError::NoForm(FormTarget::Edit))?
            .cancel();
        Ok(())
    }

    pub fn cancel(&mut self, target: FormTarget) -> AppResult<()> {
        match target {
            FormTarget::Create => self.cancel_create(),
            FormTarget::Edit => self.cancel_edit(),
        }
    }

    pub fn edit(&mut self, target: FormTarget, edit: FormEdit) -> AppResult<()> {
        self.form_mut(target)?.apply(edit);
        Ok(())
    }

    pub fn set_field(&mut self, target: FormTarget, field: FormField, value: &str) -> AppResult<()> {
        self.form_mut(target)?.set_field(field, value)?;
        Ok(())
    }

    /// Validate the create form and hand out the create call.
    pub fn submit_create(&self) -> AppResult<PendingOp> {
        let form = self
            .create_form
            .as_ref()
            .ok_or(AppError::NoForm(FormTarget::Create))?;
        let draft = form.submit()?;
        let store = Arc::clone(&self.store);
        Ok(async move { Completion::Created(store.create(&draft).await) }.boxed())
    }

    /// Validate the edit form and hand out the update call for its record.
    pub fn submit_edit(&self) -> AppResult<PendingOp> {
        let form = self
            .edit_form
            .as_ref()
            .ok_or(AppError::NoForm(FormTarget::Edit))?;
        let id = form
            .editing()
            .cloned()
            .ok_or(AppError::NoForm(FormTarget::Edit))?;
        let draft = form.submit()?;
        let store = Arc::clone(&self.store);
        Ok(async move {
            let result = store.update(&id, &draft).await;
            Completion::Updated { id, result }
        }
        .boxed())
    }

    pub fn submit(&self, target: FormTarget) -> AppResult<PendingOp> {
        match target {
            FormTarget::Create => self.submit_create(),
            FormTarget::Edit => self.submit_edit(),
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub async fn request_delete(&mut self, id: &ProjectId) -> AppResult<()> {
        self.store.request_delete(id).await?;
        Ok(())
    }

    pub async fn decline_delete(&mut self) -> Option<ProjectId> {
        self.store.decline_delete().await
    }

    pub fn confirm_delete(&self) -> PendingOp {
        let store = Arc::clone(&self.store);
        async move { Completion::Deleted(store.confirm_delete().await) }.boxed()
    }

    // -----------------------------------------------------------------------
    // Completions and messages
    // -----------------------------------------------------------------------

    /// Apply the UI consequences of a finished remote operation.
    ///
    /// Successful create/update close their form; any failure leaves the
    /// form open with the user's values. Returns whether the forms or the
    /// notice changed; store changes arrive on the store's event bus.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let before = self.local_state();
        self.notice = None;
        match completion {
            Completion::Loaded(result) => self.absorb(result.map(|_| ())),
            Completion::Created(Ok(_)) => self.create_form = None,
            Completion::Created(Err(e)) => self.absorb(Err(e)),
            Completion::Updated { id, result: Ok(_) } => self.close_edit_for(&id),
            Completion::Updated { result: Err(e), .. } => self.absorb(Err(e)),
            Completion::Deleted(Ok(id)) => self.close_edit_for(&id),
            Completion::Deleted(Err(e)) => self.absorb(Err(e)),
        }
        self.local_state() != before
    }

    fn local_state(&self) -> (bool, Option<ProjectId>, Option<String>) {
        (
            self.create_form.is_some(),
            self.edit_form.as_ref().and_then(|f| f.editing()).cloned(),
            self.notice.clone(),
        )
    }

    /// Only close the edit form if it still targets `id`.
    fn close_edit_for(&mut self, id: &ProjectId) {
        if self.edit_form.as_ref().and_then(|f| f.editing()) == Some(id) {
            self.edit_form = None;
        }
    }

    /// Remote failures are already on the store banner; local rejections
    /// become the notice.
    fn absorb(&mut self, result: Result<(), SyncError>) {
        match result {
            Ok(()) | Err(SyncError::Remote { .. }) => {}
            Err(e) => self.notice = Some(e.user_message()),
        }
    }

    /// Show a locally raised error in the banner.
    pub fn report(&mut self, error: &AppError) {
        tracing::debug!(error = %error, "Command rejected");
        self.notice = Some(error.user_message());
    }

    pub async fn dismiss_error(&mut self) {
        self.notice = None;
        self.store.dismiss_error().await;
    }

    pub async fn view(&self) -> ViewModel {
        let snapshot = self.store.snapshot().await;
        view::build(
            &snapshot,
            self.notice.as_deref(),
            self.create_form.as_ref(),
            self.edit_form.as_ref(),
            &self.date_format,
        )
    }
}
