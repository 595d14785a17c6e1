use std::fmt;

/// A remote operation against the projects collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Load,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Static banner text shown when the operation fails. The underlying
    /// error only goes to the log.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Load => "Failed to fetch projects",
            Operation::Create => "Failed to create project",
            Operation::Update => "Failed to update project",
            Operation::Delete => "Failed to delete project",
        }
    }

    fn log_message(self) -> &'static str {
        match self {
            Operation::Load => "Error fetching projects",
            Operation::Create => "Error creating project",
            Operation::Update => "Error updating project",
            Operation::Delete => "Error deleting project",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an operation is in `idle -> pending -> succeeded | failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

pub(crate) fn log_failure(op: Operation, error: &dyn std::error::Error) {
    tracing::error!(operation = %op, error = %error, "{}", op.log_message());
}
