use planboard_client::ApiError;
use planboard_core::types::ProjectId;

use crate::operation::Operation;

/// Errors returned by [`ProjectStore`](crate::ProjectStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The remote call failed; the local collection is unchanged.
    #[error("Remote {op} failed: {source}")]
    Remote { op: Operation, source: ApiError },

    /// Another delete is awaiting confirmation.
    #[error("Delete of project {0} is awaiting confirmation")]
    ConfirmationPending(ProjectId),

    #[error("No delete is awaiting confirmation")]
    NoPendingConfirmation,

    /// A delete for this id has been sent and not yet answered.
    #[error("Delete of project {0} is already in progress")]
    DeleteInFlight(ProjectId),

    #[error("Project {0} is not in the local collection")]
    UnknownProject(ProjectId),
}

impl SyncError {
    /// Text suitable for the user-facing banner.
    ///
    /// Remote failures map to the operation's static message; the detail
    /// stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Remote { op, .. } => op.failure_message().to_string(),
            other => other.to_string(),
        }
    }
}
