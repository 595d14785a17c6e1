//! REST client for the remote projects store.
//!
//! - [`ProjectsApi`] wraps the `/api/projects` HTTP resource using
//!   [`reqwest`].
//! - [`ProjectRemote`] is the seam the sync layer depends on, so it can be
//!   driven by an in-process fake in tests.
//! - [`ClientConfig`] holds the base URL and optional request timeout.

pub mod api;
pub mod config;
pub mod remote;

pub use api::{ApiError, ProjectsApi};
pub use config::ClientConfig;
pub use remote::ProjectRemote;
