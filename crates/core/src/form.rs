//! Edit buffer for creating or editing a single project.
//!
//! [`ProjectForm`] never talks to the remote store. Submitting yields a
//! [`ProjectDraft`] for the owner to send; cancelling consumes the form.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::project::{parse_due_date, Project, ProjectDraft, ProjectStatus, DUE_DATE_INPUT_FORMAT};
use crate::types::ProjectId;

/// A field of the project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Description,
    DueDate,
    Status,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Description => "description",
            FormField::DueDate => "due_date",
            FormField::Status => "status",
        }
    }

    /// Whether the field must be non-empty on submit.
    pub fn is_required(self) -> bool {
        matches!(self, FormField::Name | FormField::DueDate)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "description" | "desc" => Ok(FormField::Description),
            "due" | "due_date" | "due-date" => Ok(FormField::DueDate),
            "status" => Ok(FormField::Status),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// A single field change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Name(String),
    Description(String),
    /// Raw date input, `YYYY-MM-DD` or empty.
    DueDate(String),
    Status(ProjectStatus),
}

/// Errors raised by form input handling.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(FormField),

    #[error("Unknown form field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// The uncommitted field values of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    pub name: String,
    pub description: String,
    /// Date input value, `YYYY-MM-DD` or empty.
    pub due_date: String,
    pub status: ProjectStatus,
}

impl FormBuffer {
    fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description_text().to_string(),
            due_date: project.due_date.format(DUE_DATE_INPUT_FORMAT).to_string(),
            status: project.status,
        }
    }
}

/// Form state for one create or edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    /// Project the buffer was last seeded from; `None` for a create form.
    seed: Option<Project>,
    buffer: FormBuffer,
}

impl ProjectForm {
    /// Empty form for creating a new project.
    pub fn new() -> Self {
        Self {
            seed: None,
            buffer: FormBuffer::default(),
        }
    }

    /// Form seeded from an existing project.
    pub fn for_project(project: &Project) -> Self {
        Self {
            seed: Some(project.clone()),
            buffer: FormBuffer::from_project(project),
        }
    }

    /// Re-seed the form.
    ///
    /// A project that differs from the last seed resets the buffer and
    /// discards unsaved edits. An equal project, or `None`, leaves the
    /// buffer as it is.
    ///
    /// Equality is by value, not id: a newer server copy of the record
    /// being edited also resets the buffer.
    pub fn reseed(&mut self, project: Option<&Project>) {
        let Some(project) = project else {
            return;
        };
        if self.seed.as_ref() == Some(project) {
            return;
        }
        self.buffer = FormBuffer::from_project(project);
        self.seed = Some(project.clone());
    }

    /// Id of the project being edited, `None` for a create form.
    pub fn editing(&self) -> Option<&ProjectId> {
        self.seed.as_ref().map(|p| &p.id)
    }

    pub fn buffer(&self) -> &FormBuffer {
        &self.buffer
    }

    pub fn title(&self) -> &'static str {
        if self.seed.is_some() {
            "Edit Project"
        } else {
            "Create New Project"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.seed.is_some() {
            "Update Project"
        } else {
            "Create Project"
        }
    }

    /// Apply one field change. Other fields are untouched.
    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Name(value) => self.buffer.name = value,
            FormEdit::Description(value) => self.buffer.description = value,
            FormEdit::DueDate(value) => self.buffer.due_date = value,
            FormEdit::Status(value) => self.buffer.status = value,
        }
    }

    /// Apply a change from raw text input.
    ///
    /// An unrecognised status leaves the buffer unchanged.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let edit = match field {
            FormField::Name => FormEdit::Name(value.to_string()),
            FormField::Description => FormEdit::Description(value.to_string()),
            FormField::DueDate => FormEdit::DueDate(value.trim().to_string()),
            FormField::Status => FormEdit::Status(value.parse()?),
        };
        self.apply(edit);
        Ok(())
    }

    /// Produce the payload for the owner to send.
    ///
    /// Only presence of `name` and `due_date` is checked, plus that the date
    /// input holds a calendar date.
    pub fn submit(&self) -> Result<ProjectDraft, FormError> {
        if self.buffer.name.is_empty() {
            return Err(FormError::Required(FormField::Name));
        }
        if self.buffer.due_date.is_empty() {
            return Err(FormError::Required(FormField::DueDate));
        }
        let due_date = parse_due_date(&self.buffer.due_date)?;

        Ok(ProjectDraft {
            name: self.buffer.name.clone(),
            description: self.buffer.description.clone(),
            due_date,
            status: self.buffer.status,
        })
    }

    /// Abandon the form.
    pub fn cancel(self) {}
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self::new()
    }
}
