//! Planboard terminal client library.
//!
//! Exposes the coordinator, view model, and shell so integration tests and
//! the binary entrypoint can both drive them.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod shell;
pub mod view;
