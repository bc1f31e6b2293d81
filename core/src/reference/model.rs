//! Reference entity definitions

use serde::{Deserialize, Serialize};

use crate::ids::{ClientId, TeamId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Display name, falling back to the username
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Which selector a reference collection feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Clients,
    Teams,
    Users,
}

impl ReferenceKind {
    /// Neutral first option of the selector
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Clients => "Select client...",
            Self::Teams => "No team...",
            Self::Users => "Assign to (optional)",
        }
    }

    /// Placeholder shown once loading has failed
    pub fn failed_placeholder(&self) -> &'static str {
        match self {
            Self::Clients | Self::Teams => self.placeholder(),
            Self::Users => "Assignment unavailable (error)",
        }
    }

    /// Notice shown when loading fails
    pub fn load_error(&self) -> &'static str {
        match self {
            Self::Clients => "Error loading clients.",
            Self::Teams => "Error loading teams.",
            Self::Users => "Error loading users for task assignment.",
        }
    }
}

/// One selectable `{id, label}` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceOption {
    pub id: i64,
    pub label: String,
}

impl ReferenceOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

impl From<&Client> for ReferenceOption {
    fn from(client: &Client) -> Self {
        Self::new(client.id.0, client.name.clone())
    }
}

impl From<&Team> for ReferenceOption {
    fn from(team: &Team) -> Self {
        Self::new(team.id.0, team.name.clone())
    }
}

impl From<&User> for ReferenceOption {
    fn from(user: &User) -> Self {
        Self::new(user.id.0, user.label())
    }
}
