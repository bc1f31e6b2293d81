//! In-memory API and shell fakes for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Notify;

use crate::api::ProjectApi;
use crate::error::Error;
use crate::ids::{ClientId, ProjectId, TaskId, TeamId, UserId};
use crate::navigation::{Confirm, Navigator, Route};
use crate::notifier::{NoticeSurface, Notifier};
use crate::project::{Project, ProjectDraft, ProjectFilter, ProjectPatch};
use crate::reference::{Client, Team, User};
use crate::status::Status;
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::Result;

/// A request the fake received
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Data {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    clients: Vec<Client>,
    teams: Vec<Team>,
    users: Vec<User>,
    next_id: i64,
}

#[derive(Default)]
pub struct FakeApi {
    data: Mutex<Data>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, VecDeque<Error>>>,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    /// One project (id 1) with three tasks, two clients, two teams, two users
    pub fn seeded() -> Self {
        let api = Self::default();
        {
            let mut data = api.data.lock().unwrap();
            data.projects.push(
                Project::new(ProjectId(1), "Sito Demo")
                    .with_client(ClientId(1))
                    .with_team(TeamId(1))
                    .with_status(Status::InProgress),
            );
            data.tasks = vec![
                Task::new(TaskId(10), ProjectId(1), "Wireframe").with_status(Status::ToDo),
                Task::new(TaskId(11), ProjectId(1), "Copy").with_status(Status::Completed),
                Task::new(TaskId(12), ProjectId(1), "Deploy").with_status(Status::InProgress),
            ];
            data.clients = vec![
                Client {
                    id: ClientId(1),
                    name: "ACME".into(),
                    contact_info: None,
                },
                Client {
                    id: ClientId(2),
                    name: "Globex".into(),
                    contact_info: None,
                },
            ];
            data.teams = vec![
                Team {
                    id: TeamId(1),
                    name: "Frontend".into(),
                },
                Team {
                    id: TeamId(2),
                    name: "Backend".into(),
                },
            ];
            data.users = vec![
                User {
                    id: UserId(1),
                    username: "mrossi".into(),
                    name: Some("Mario Rossi".into()),
                },
                User {
                    id: UserId(2),
                    username: "lbianchi".into(),
                    name: None,
                },
            ];
            data.next_id = 100;
        }
        api
    }

    /// Make the next call of `method` fail with `error`
    pub fn fail_next(&self, method: &'static str, error: Error) {
        self.failures
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(error);
    }

    /// Hold every `update_task` until the returned handle is notified
    pub fn hold_task_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than reference-data reads
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != "GET")
            .collect()
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.data
            .lock()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn project(&self, id: ProjectId) -> Option<Project> {
        self.data
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn record<B: Serialize>(
        &self,
        name: &'static str,
        method: &'static str,
        path: String,
        body: Option<&B>,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call {
            method,
            path,
            body: body.map(|b| serde_json::to_value(b).unwrap()),
        });
        match self
            .failures
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        data.next_id
    }
}

#[async_trait]
impl ProjectApi for FakeApi {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        self.record::<()>("list_projects", "GET", "/api/projects".into(), None)?;
        let data = self.data.lock().unwrap();
        Ok(data
            .projects
            .iter()
            .filter(|p| filter.status.as_ref().map_or(true, |s| &p.status == s))
            .filter(|p| filter.client_id.map_or(true, |c| p.client_id == Some(c)))
            .filter(|p| filter.team_id.map_or(true, |t| p.team_id == Some(t)))
            .cloned()
            .collect())
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project> {
        self.record::<()>("get_project", "GET", format!("/api/projects/{}", id), None)?;
        self.project(id)
            .ok_or_else(|| Error::http(404, "Project not found"))
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        self.record("create_project", "POST", "/api/projects".into(), Some(draft))?;
        let mut project = Project::new(ProjectId(self.next_id()), draft.name.clone())
            .with_status(draft.status.clone());
        project.client_id = draft.client_id;
        project.team_id = draft.team_id;
        project.deadline = draft.deadline;
        project.description = draft.description.clone();
        self.data.lock().unwrap().projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>> {
        self.record("update_project", "PUT", format!("/api/projects/{}", id), Some(patch))?;
        let mut data = self.data.lock().unwrap();
        let project = data
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::http(404, "Project not found"))?;
        if let Some(name) = &patch.name {
            project.name = name.clone();
        }
        if let Some(client_id) = patch.client_id {
            project.client_id = client_id;
        }
        if let Some(team_id) = patch.team_id {
            project.team_id = team_id;
        }
        if let Some(status) = &patch.status {
            project.status = status.clone();
        }
        if patch.deadline.is_some() {
            project.deadline = patch.deadline;
        }
        if let Some(description) = &patch.description {
            project.description = Some(description.clone());
        }
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.record::<()>("delete_project", "DELETE", format!("/api/projects/{}", id), None)?;
        let mut data = self.data.lock().unwrap();
        data.projects.retain(|p| p.id != id);
        data.tasks.retain(|t| t.project_id != id);
        Ok(())
    }

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        self.record::<()>(
            "list_tasks",
            "GET",
            format!("/api/projects/{}/tasks", project_id),
            None,
        )?;
        let data = self.data.lock().unwrap();
        Ok(data
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, project_id: ProjectId, draft: &TaskDraft) -> Result<Task> {
        self.record(
            "create_task",
            "POST",
            format!("/api/projects/{}/tasks", project_id),
            Some(draft),
        )?;
        let mut task = Task::new(TaskId(self.next_id()), project_id, draft.name.clone())
            .with_status(draft.status.clone());
        task.description = Some(draft.description.clone()).filter(|d| !d.is_empty());
        task.assignee_id = draft.assignee_id;
        task.due_date = draft.due_date;
        self.data.lock().unwrap().tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>> {
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("update_task", "PUT", format!("/api/tasks/{}", id), Some(patch))?;
        let mut data = self.data.lock().unwrap();
        let task = data
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::http(404, "Task not found"))?;
        patch.apply_to(task);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.record::<()>("delete_task", "DELETE", format!("/api/tasks/{}", id), None)?;
        self.data.lock().unwrap().tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        self.record::<()>("list_clients", "GET", "/api/clients".into(), None)?;
        Ok(self.data.lock().unwrap().clients.clone())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        self.record::<()>("list_teams", "GET", "/api/teams".into(), None)?;
        Ok(self.data.lock().unwrap().teams.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.record::<()>("list_users", "GET", "/api/users".into(), None)?;
        Ok(self.data.lock().unwrap().users.clone())
    }
}

struct NullSurface;

impl NoticeSurface for NullSurface {
    fn show(&self, _message: &str) {}
    fn hide(&self) {}
}

/// Notifier that displays nowhere but keeps its slot readable
pub fn quiet_notifier() -> Arc<Notifier> {
    Arc::new(Notifier::new(Arc::new(NullSurface)))
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Always answers the same and remembers the prompts
pub struct FixedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for FixedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
