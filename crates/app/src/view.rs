//! View model and plain-text rendering.

use std::fmt::Write as _;

use planboard_core::form::{FormBuffer, FormField, ProjectForm};
use planboard_core::project::ProjectStatus;
use planboard_core::types::ProjectId;
use planboard_sync::StoreSnapshot;

use crate::coordinator::FormTarget;

pub const HEADER_TEXT: &str = "Project Management";
pub const LOADING_TEXT: &str = "Loading projects...";
pub const EMPTY_TEXT: &str = "No projects found. Create your first project!";
pub const CONFIRM_DELETE_TEXT: &str = "Are you sure you want to delete this project?";

/// Everything the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub banner: Option<String>,
    pub body: Body,
    pub confirmation: Option<ConfirmPrompt>,
    /// Create form first, then edit form, when open.
    pub forms: Vec<FormView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Empty,
    List(Vec<ProjectCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    /// 1-based position, usable as a shell reference.
    pub position: usize,
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub due: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub id: ProjectId,
    /// Name of the project, if it is still in the collection.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub target: FormTarget,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub buffer: FormBuffer,
}

impl FormView {
    fn from_form(target: FormTarget, form: &ProjectForm) -> Self {
        Self {
            target,
            title: form.title(),
            submit_label: form.submit_label(),
            buffer: form.buffer().clone(),
        }
    }
}

/// Assemble the view model from a store snapshot and coordinator state.
///
/// A local `notice` is newer than the store's error and takes the banner.
pub fn build(
    snapshot: &StoreSnapshot,
    notice: Option<&str>,
    create_form: Option<&ProjectForm>,
    edit_form: Option<&ProjectForm>,
    date_format: &str,
) -> ViewModel {
    let banner = notice
        .map(str::to_string)
        .or_else(|| snapshot.error.map(str::to_string));

    let body = if snapshot.loading {
        Body::Loading
    } else if snapshot.projects.is_empty() {
        Body::Empty
    } else {
        Body::List(
            snapshot
                .projects
                .iter()
                .enumerate()
                .map(|(index, p)| ProjectCard {
                    position: index + 1,
                    id: p.id.clone(),
                    name: p.name.clone(),
                    description: p.description_text().to_string(),
                    due: p.display_due_date(date_format),
                    status: p.status,
                })
                .collect(),
        )
    };

    let confirmation = snapshot.pending_confirmation.as_ref().map(|id| ConfirmPrompt {
        id: id.clone(),
        name: snapshot.get(id).map(|p| p.name.clone()),
    });

    let forms = [
        create_form.map(|f| FormView::from_form(FormTarget::Create, f)),
        edit_form.map(|f| FormView::from_form(FormTarget::Edit, f)),
    ]
    .into_iter()
    .flatten()
    .collect();

    ViewModel {
        banner,
        body,
        confirmation,
        forms,
    }
}

/// Render the view model as terminal text.
pub fn render(view: &ViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {HEADER_TEXT} ==");

    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "! {banner}");
    }

    match &view.body {
        Body::Loading => {
            let _ = writeln!(out, "{LOADING_TEXT}");
        }
        Body::Empty => {
            let _ = writeln!(out, "{EMPTY_TEXT}");
        }
        Body::List(cards) => {
            for card in cards {
                let _ = writeln!(
                    out,
                    "{:>3}. {}  [{}]  Due: {}",
                    card.position,
                    card.name,
                    card.status.label(),
                    card.due
                );
                if !card.description.is_empty() {
                    let _ = writeln!(out, "     {}", card.description);
                }
            }
        }
    }

    for form in &view.forms {
        render_form(&mut out, form);
    }

    if let Some(prompt) = &view.confirmation {
        let subject = prompt.name.as_deref().unwrap_or(prompt.id.as_str());
        let _ = writeln!(out, "? {CONFIRM_DELETE_TEXT} ({subject}) [yes/no]");
    }

    out
}

fn render_form(out: &mut String, form: &FormView) {
    let _ = writeln!(out, "-- {} ({}) --", form.title, form.target);
    let rows = [
        (FormField::Name, "Project Name", form.buffer.name.as_str()),
        (FormField::Description, "Description", form.buffer.description.as_str()),
        (FormField::DueDate, "Due Date", form.buffer.due_date.as_str()),
        (FormField::Status, "Status", form.buffer.status.label()),
    ];
    for (field, label, value) in rows {
        let marker = if field.is_required() { " *" } else { "" };
        let _ = writeln!(out, "   {label}{marker}: {value}");
    }
    let _ = writeln!(
        out,
        "   [save {0}] {1}   [cancel {0}] Cancel",
        form.target, form.submit_label
    );
}
