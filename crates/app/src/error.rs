use planboard_core::error::CoreError;
use planboard_core::form::FormError;
use planboard_sync::SyncError;

use crate::coordinator::FormTarget;
use crate::shell::ShellError;

/// Errors surfaced to the user by the client application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("No {0} form is open")]
    NoForm(FormTarget),
}

impl AppError {
    /// Banner text. Remote failures never expose their detail.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Sync(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Convenience type alias for coordinator and shell results.
pub type AppResult<T> = Result<T, AppError>;
