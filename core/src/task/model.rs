//! Task model definitions

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::deserialize_date_opt;
use crate::ids::{ProjectId, TaskId, UserId};
use crate::status::{self, Status};

fn default_task_status() -> Status {
    Status::ToDo
}

fn deserialize_task_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Status, D::Error> {
    Ok(status::deserialize_present(deserializer)?.unwrap_or_else(default_task_status))
}

/// A checklist item owned by exactly one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_date_opt")]
    pub due_date: Option<NaiveDate>,
    #[serde(
        default = "default_task_status",
        deserialize_with = "deserialize_task_status"
    )]
    pub status: Status,
    /// Read-only, filled in by the server
    #[serde(default)]
    pub assignee_name: Option<String>,
    /// Read-only, filled in by the server
    #[serde(default)]
    pub project_name: Option<String>,
}

impl Task {
    /// Create a new task with the given id and name
    pub fn new(id: TaskId, project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
            description: None,
            assignee_id: None,
            due_date: None,
            status: default_task_status(),
            assignee_name: None,
            project_name: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, assignee_id: UserId, name: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id);
        self.assignee_name = Some(name.into());
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// Body of `POST /api/projects/{id}/tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub name: String,
    pub project_id: ProjectId,
    pub description: String,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub status: Status,
}

/// Body of `PUT /api/tasks/{id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Option<UserId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Status-only patch, the body of a checkbox toggle
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply the patch to a local copy of the task
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(status) = &self.status {
            task.status = status.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}
