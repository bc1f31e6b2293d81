//! Work status shared by projects and tasks
//!
//! The API stores status as a free-form string. Known values are matched
//! case-insensitively; anything else is kept verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status of a project or task
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    ToDo,
    InProgress,
    Completed,
    Other(String),
}

/// Visual treatment of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Completed,
    InProgress,
    ToDo,
    Neutral,
}

impl Status {
    /// Parse a raw status string. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "to do" | "todo" => Self::ToDo,
            "in corso" => Self::InProgress,
            "completato" => Self::Completed,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Wire spelling of the status
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::ToDo => "To Do",
            Self::InProgress => "In Corso",
            Self::Completed => "Completato",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn tone(&self) -> BadgeTone {
        match self {
            Self::Completed => BadgeTone::Completed,
            Self::InProgress => BadgeTone::InProgress,
            Self::ToDo => BadgeTone::ToDo,
            Self::Pending | Self::Other(_) => BadgeTone::Neutral,
        }
    }

    /// Status written when a task checkbox is set to `checked`.
    ///
    /// Unchecking always yields `In Corso`, whatever the task held before.
    pub fn for_checked(checked: bool) -> Self {
        if checked {
            Self::Completed
        } else {
            Self::InProgress
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::parse(&s)).unwrap_or(Self::Other(String::new())))
    }
}

/// Read a status field, with `null` and blank strings meaning "not set"
pub(crate) fn deserialize_present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Status>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| Status::parse(&s)))
}
