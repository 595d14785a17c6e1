//! Line commands for the terminal client.

use std::fmt;

use planboard_core::error::CoreError;
use planboard_core::form::{FormError, FormField};
use planboard_core::types::ProjectId;

use crate::coordinator::{Coordinator, FormTarget, PendingOp};
use crate::error::AppResult;

pub const HELP: &str = "\
Commands:
  list                              redraw the project list
  new                               open the create form
  edit <ref>                        edit a project (list position or id)
  set [create|edit] <field> <value> change a form field (name, description, due, status)
  save [create|edit]                submit a form
  cancel [create|edit]              close a form without saving
  delete <ref>                      delete a project (asks for confirmation)
  yes | no                          answer the delete confirmation
  reload                            fetch the list again
  dismiss                           clear the message banner
  help                              show this help
  quit                              exit";

/// A project as referred to on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// 1-based list position.
    Position(usize),
    Id(ProjectId),
}

impl ProjectRef {
    fn parse(token: &str) -> Self {
        match token.parse::<usize>() {
            Ok(n) if n >= 1 => ProjectRef::Position(n),
            _ => ProjectRef::Id(ProjectId::from(token)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    New,
    Edit(ProjectRef),
    Set {
        target: Option<FormTarget>,
        field: FormField,
        value: String,
    },
    Save(Option<FormTarget>),
    Cancel(Option<FormTarget>),
    Delete(ProjectRef),
    Yes,
    No,
    Reload,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error(transparent)]
    Form(#[from] FormError),
}

/// What the event loop should do after a command.
pub enum Outcome {
    Continue,
    Spawn(PendingOp),
    Help,
    Quit,
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Continue => f.write_str("Continue"),
            Outcome::Spawn(_) => f.write_str("Spawn(..)"),
            Outcome::Help => f.write_str("Help"),
            Outcome::Quit => f.write_str("Quit"),
        }
    }
}

/// Split off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn parse_target(word: &str) -> Option<FormTarget> {
    match word.to_ascii_lowercase().as_str() {
        "create" | "new" => Some(FormTarget::Create),
        "edit" => Some(FormTarget::Edit),
        _ => None,
    }
}

/// Parse an optional `[create|edit]` argument with nothing after it.
fn parse_optional_target(rest: &str) -> Result<Option<FormTarget>, ShellError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(None);
    }
    parse_target(rest)
        .map(Some)
        .ok_or_else(|| ShellError::UnexpectedArgument(rest.to_string()))
}

fn parse_ref(command: &'static str, rest: &str) -> Result<ProjectRef, ShellError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ShellError::MissingArgument {
            command,
            argument: "a project position or id",
        });
    }
    Ok(ProjectRef::parse(rest))
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ShellError> {
    let (word, rest) = split_word(line);
    if word.is_empty() {
        return Ok(None);
    }

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "new" | "create" => Command::New,
        "edit" => Command::Edit(parse_ref("edit", rest)?),
        "delete" | "rm" => Command::Delete(parse_ref("delete", rest)?),
        "set" => {
            let (first, after_first) = split_word(rest);
            let (target, field_word, value) = match parse_target(first) {
                Some(target) => {
                    let (field, value) = split_word(after_first);
                    (Some(target), field, value)
                }
                None => (None, first, after_first),
            };
            if field_word.is_empty() {
                return Err(ShellError::MissingArgument {
                    command: "set",
                    argument: "a field name",
                });
            }
            Command::Set {
                target,
                field: field_word.parse()?,
                value: value.trim_end().to_string(),
            }
        }
        "save" | "submit" => Command::Save(parse_optional_target(rest)?),
        "cancel" => Command::Cancel(parse_optional_target(rest)?),
        "yes" | "y" => Command::Yes,
        "no" | "n" => Command::No,
        "reload" | "refresh" => Command::Reload,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Resolve a reference against the current collection.
async fn resolve(coordinator: &Coordinator, reference: &ProjectRef) -> AppResult<ProjectId> {
    match reference {
        ProjectRef::Id(id) => Ok(id.clone()),
        ProjectRef::Position(n) => {
            let snapshot = coordinator.store().snapshot().await;
            snapshot
                .projects
                .get(n - 1)
                .map(|p| p.id.clone())
                .ok_or_else(|| {
                    CoreError::NotFound {
                        entity: "Project",
                        id: format!("#{n}"),
                    }
                    .into()
                })
        }
    }
}

/// Run a command against the coordinator.
pub async fn execute(coordinator: &mut Coordinator, command: Command) -> AppResult<Outcome> {
    let outcome = match command {
        Command::List => Outcome::Continue,
        Command::New => {
            coordinator.open_create_form();
            Outcome::Continue
        }
        Command::Edit(reference) => {
            let id = resolve(coordinator, &reference).await?;
            coordinator.open_edit_form(&id).await?;
            Outcome::Continue
        }
        Command::Set {
            target,
            field,
            value,
        } => {
            let target = coordinator.default_target(target);
            coordinator.set_field(target, field, &value)?;
            Outcome::Continue
        }
        Command::Save(target) => {
            let target = coordinator.default_target(target);
            Outcome::Spawn(coordinator.submit(target)?)
        }
        Command::Cancel(target) => {
            let target = coordinator.default_target(target);
            coordinator.cancel(target)?;
            Outcome::Continue
        }
        Command::Delete(reference) => {
            let id = resolve(coordinator, &reference).await?;
            coordinator.request_delete(&id).await?;
            Outcome::Continue
        }
        Command::Yes => Outcome::Spawn(coordinator.confirm_delete()),
        Command::No => {
            coordinator.decline_delete().await;
            Outcome::Continue
        }
        Command::Reload => Outcome::Spawn(coordinator.reload()),
        Command::Dismiss => {
            coordinator.dismiss_error().await;
            Outcome::Continue
        }
        Command::Help => Outcome::Help,
        Command::Quit => Outcome::Quit,
    };
    Ok(outcome)
}
