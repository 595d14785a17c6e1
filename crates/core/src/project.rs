//! Project record, status enum, and the draft payload sent to the remote store.
//!
//! The remote store is document shaped: the identifier travels as `_id`,
//! due dates may come back as full timestamps, and `status` may be missing
//! on records written by older clients. Decoding normalises all of that so
//! the rest of the workspace only ever sees a [`Project`] with a calendar
//! [`DueDate`] and a concrete [`ProjectStatus`].

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DueDate, ProjectId};

/// Format of the date portion exchanged with the remote store and used by
/// the edit form's date field.
pub const DUE_DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Default human-readable date format for list display (`3/1/2024`).
pub const DEFAULT_DISPLAY_FORMAT: &str = "%-m/%-d/%Y";

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Every status, in the order offered by the form.
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    /// Accepts wire values and display labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ProjectStatus::ALL
            .into_iter()
            .find(|status| {
                normalized == status.as_str() || normalized == status.label().to_ascii_lowercase()
            })
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Due dates
// ---------------------------------------------------------------------------

/// Parse a due date as sent by the remote store or typed into the form.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp. A
/// timestamp is reduced to its UTC calendar date.
pub fn parse_due_date(value: &str) -> Result<DueDate, CoreError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DUE_DATE_INPUT_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Returns `true` if `format` is a usable chrono strftime format.
pub fn is_valid_display_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Render a due date with a strftime `format`, falling back to
/// `YYYY-MM-DD` when the format cannot be applied.
pub fn format_due_date(date: DueDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(DUE_DATE_INPUT_FORMAT));
    }
    out
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<DueDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<ProjectStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ProjectStatus>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A project as held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub due_date: DueDate,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: ProjectStatus,
}

impl Project {
    /// Description text, empty when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Due date rendered for display.
    pub fn display_due_date(&self, format: &str) -> String {
        format_due_date(self.due_date, format)
    }
}

// ---------------------------------------------------------------------------
// ProjectDraft
// ---------------------------------------------------------------------------

/// Body of a create or update request: every project field except `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub due_date: DueDate,
    pub status: ProjectStatus,
}

impl ProjectDraft {
    /// Draft with an empty description and the default status.
    pub fn new(name: impl Into<String>, due_date: DueDate) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            due_date,
            status: ProjectStatus::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description_text().to_string(),
            due_date: project.due_date,
            status: project.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> DueDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decodes_document_store_record() {
        let json = serde_json::json!({
            "_id": "65f1c0ffee",
            "name": "Launch",
            "description": "Ship it",
            "due_date": "2024-03-01T00:00:00.000Z",
            "status": "on-hold",
            "createdAt": "2024-02-01T10:00:00.000Z",
            "__v": 0
        });

        let project: Project = serde_json::from_value(json).unwrap();
        assert_eq!(project.id.as_str(), "65f1c0ffee");
        assert_eq!(project.name, "Launch");
        assert_eq!(project.description_text(), "Ship it");
        assert_eq!(project.due_date, date(2024, 3, 1));
        assert_eq!(project.status, ProjectStatus::OnHold);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = serde_json::json!({
            "id": "p1",
            "name": "Bare",
            "due_date": "2024-01-15",
            "status": null
        });

        let project: Project = serde_json::from_value(json).unwrap();
        assert_eq!(project.id.as_str(), "p1");
        assert!(project.description.is_none());
        assert_eq!(project.description_text(), "");
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let json = serde_json::json!({"name": "No id", "due_date": "2024-01-15"});
        assert!(serde_json::from_value::<Project>(json).is_err());
    }

    #[test]
    fn record_with_bad_date_is_rejected() {
        let json = serde_json::json!({"_id": "x", "name": "Bad", "due_date": "soon"});
        assert!(serde_json::from_value::<Project>(json).is_err());
    }

    #[test]
    fn timestamp_is_reduced_to_utc_date() {
        assert_eq!(
            parse_due_date("2024-03-01T23:30:00-02:00").unwrap(),
            date(2024, 3, 2)
        );
        assert_eq!(parse_due_date(" 2024-02-20 ").unwrap(), date(2024, 2, 20));
        assert_matches!(parse_due_date(""), Err(CoreError::InvalidDate(_)));
    }

    #[test]
    fn draft_serializes_plain_date_and_kebab_status() {
        let draft = ProjectDraft::new("Review", date(2024, 3, 10))
            .with_description("Quarterly")
            .with_status(ProjectStatus::OnHold);

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["name"], "Review");
        assert_eq!(json["description"], "Quarterly");
        assert_eq!(json["due_date"], "2024-03-10");
        assert_eq!(json["status"], "on-hold");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn status_parses_wire_values_and_labels() {
        assert_eq!("active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!("On Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!("COMPLETED".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert_matches!("archived".parse::<ProjectStatus>(), Err(CoreError::UnknownStatus(_)));
    }

    #[test]
    fn display_format_validation() {
        assert!(is_valid_display_format(DEFAULT_DISPLAY_FORMAT));
        assert!(is_valid_display_format("%d %b %Y"));
        assert!(!is_valid_display_format(""));
        assert!(!is_valid_display_format("%Q"));
    }

    #[test]
    fn due_date_display() {
        assert_eq!(format_due_date(date(2024, 3, 1), DEFAULT_DISPLAY_FORMAT), "3/1/2024");
        assert_eq!(format_due_date(date(2024, 3, 1), "%d %b %Y"), "01 Mar 2024");
    }
}
