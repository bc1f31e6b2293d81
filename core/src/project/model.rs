//! Project model definitions

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::{deserialize_date_opt, deserialize_datetime_opt};
use crate::ids::{ClientId, ProjectId, TeamId};
use crate::status::{self, Status};

fn default_project_status() -> Status {
    Status::Pending
}

fn deserialize_project_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Status, D::Error> {
    Ok(status::deserialize_present(deserializer)?.unwrap_or_else(default_project_status))
}

/// A project as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier
    pub id: ProjectId,

    /// Human-readable project name (e.g., "Sito Demo")
    pub name: String,

    #[serde(default)]
    pub client_id: Option<ClientId>,

    #[serde(default)]
    pub team_id: Option<TeamId>,

    #[serde(
        default = "default_project_status",
        deserialize_with = "deserialize_project_status"
    )]
    pub status: Status,

    /// Only the date part of the server timestamp is kept
    #[serde(default, deserialize_with = "deserialize_date_opt")]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_datetime_opt")]
    pub creation_date: Option<NaiveDateTime>,
}

impl Project {
    /// Create a project with the given id and name
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            client_id: None,
            team_id: None,
            status: default_project_status(),
            deadline: None,
            description: None,
            creation_date: None,
        }
    }

    /// Set the client
    pub fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Set the team
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Body of `POST /api/projects`
///
/// `client_id` and `team_id` are always sent, as `null` when unset. Empty
/// deadline and description are left out so the server stores null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_id: None,
            team_id: None,
            status: default_project_status(),
            deadline: None,
            description: None,
        }
    }
}

/// Body of `PUT /api/projects/{id}`; only set fields are sent
///
/// `client_id: Some(None)` clears the client on the server, and
/// `description: Some("")` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Option<ClientId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Option<TeamId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectPatch {
    /// Status-only patch
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ProjectDraft> for ProjectPatch {
    fn from(draft: ProjectDraft) -> Self {
        Self {
            name: Some(draft.name),
            client_id: Some(draft.client_id),
            team_id: Some(draft.team_id),
            status: Some(draft.status),
            deadline: draft.deadline,
            // An emptied description has to reach the server to clear it
            description: Some(draft.description.unwrap_or_default()),
        }
    }
}

/// Query filters for `GET /api/projects`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub status: Option<Status>,
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
}

impl ProjectFilter {
    /// Key/value pairs in query order; unset filters are skipped
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(client_id) = self.client_id {
            pairs.push(("client_id", client_id.to_string()));
        }
        if let Some(team_id) = self.team_id {
            pairs.push(("team_id", team_id.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_server_project() {
        let project: Project = serde_json::from_value(json!({
            "id": 3,
            "name": "Sito Demo",
            "client_id": 1,
            "team_id": null,
            "status": "In Corso",
            "deadline": "2024-06-30T00:00:00",
            "description": "Landing page",
            "creation_date": "2024-05-01T09:15:00.000001",
            "tasks": [1, 2],
            "milestones": []
        }))
        .unwrap();

        assert_eq!(project.id, ProjectId(3));
        assert_eq!(project.client_id, Some(ClientId(1)));
        assert_eq!(project.team_id, None);
        assert_eq!(project.status, Status::InProgress);
        assert_eq!(project.deadline, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(project.creation_date.is_some());
    }

    #[test]
    fn test_null_deadline_reads_as_none() {
        let project: Project = serde_json::from_value(json!({
            "id": 4,
            "name": "No deadline",
            "status": "Pending",
            "deadline": null
        }))
        .unwrap();

        assert!(project.deadline.is_none());
        assert!(project.description.is_none());
    }

    #[test]
    fn test_null_or_blank_status_reads_as_pending() {
        for raw in [json!(null), json!(""), json!("  ")] {
            let project: Project = serde_json::from_value(json!({
                "id": 5,
                "name": "Senza stato",
                "status": raw
            }))
            .unwrap();
            assert_eq!(project.status, Status::Pending);
        }
    }

    #[test]
    fn test_patch_from_draft_sends_empty_description() {
        let mut draft = ProjectDraft::new("Sito Demo");
        draft.description = None;
        let body = serde_json::to_value(ProjectPatch::from(draft)).unwrap();
        assert_eq!(body["description"], json!(""));

        let mut draft = ProjectDraft::new("Sito Demo");
        draft.description = Some("Landing page".into());
        let body = serde_json::to_value(ProjectPatch::from(draft)).unwrap();
        assert_eq!(body["description"], json!("Landing page"));
    }

    #[test]
    fn test_draft_sends_explicit_nulls() {
        let body = serde_json::to_value(ProjectDraft::new("Sito Demo")).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Sito Demo",
                "client_id": null,
                "team_id": null,
                "status": "Pending"
            })
        );
    }

    #[test]
    fn test_status_patch_only_sends_status() {
        let body = serde_json::to_value(ProjectPatch::status(Status::Completed)).unwrap();
        assert_eq!(body, json!({ "status": "Completato" }));
    }

    #[test]
    fn test_patch_from_draft_clears_client() {
        let patch = ProjectPatch::from(ProjectDraft::new("Renamed"));
        let body = serde_json::to_value(patch).unwrap();
        assert_eq!(body["client_id"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("client_id"));
    }

    #[test]
    fn test_filter_pairs() {
        let filter = ProjectFilter {
            status: Some(Status::InProgress),
            client_id: Some(ClientId(2)),
            team_id: None,
        };
        assert_eq!(
            filter.pairs(),
            vec![
                ("client_id", "2".to_string()),
                ("status", "In Corso".to_string())
            ]
        );
        assert!(ProjectFilter::default().pairs().is_empty());
    }
}
