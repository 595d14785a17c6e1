//! Planboard domain types.
//!
//! Holds the [`Project`](project::Project) record cached from the remote
//! store, the typed [`ProjectDraft`](project::ProjectDraft) payload shared
//! between the form and the sync layer, and the
//! [`ProjectForm`](form::ProjectForm) edit buffer.

pub mod error;
pub mod form;
pub mod project;
pub mod types;
