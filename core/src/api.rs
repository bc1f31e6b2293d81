//! API trait
//!
//! Defines the interface to the remote project/task API. The HTTP
//! implementation lives in the `scheda-client` crate; tests use in-memory
//! fakes.

use async_trait::async_trait;

use crate::ids::{ProjectId, TaskId};
use crate::project::{Project, ProjectDraft, ProjectFilter, ProjectPatch};
use crate::reference::{Client, Team, User};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::Result;

/// Remote CRUD operations on projects, tasks and reference data
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// `GET /api/projects`
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>>;

    /// `GET /api/projects/{id}`
    async fn get_project(&self, id: ProjectId) -> Result<Project>;

    /// `POST /api/projects`
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project>;

    /// `PUT /api/projects/{id}`; `None` when the server answers 204
    async fn update_project(&self, id: ProjectId, patch: &ProjectPatch)
        -> Result<Option<Project>>;

    /// `DELETE /api/projects/{id}`
    async fn delete_project(&self, id: ProjectId) -> Result<()>;

    /// `GET /api/projects/{id}/tasks`
    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>>;

    /// `POST /api/projects/{id}/tasks`
    async fn create_task(&self, project_id: ProjectId, draft: &TaskDraft) -> Result<Task>;

    /// `PUT /api/tasks/{id}`; `None` when the server answers 204
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>>;

    /// `DELETE /api/tasks/{id}`
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// `GET /api/clients`
    async fn list_clients(&self) -> Result<Vec<Client>>;

    /// `GET /api/teams`
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// `GET /api/users`
    async fn list_users(&self) -> Result<Vec<User>>;
}
