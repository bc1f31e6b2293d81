//! Page state definitions

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::cache::EntityCache;
use crate::error::Error;
use crate::ids::{ClientId, ProjectId, TaskId, TeamId, UserId};
use crate::project::{Project, ProjectDraft};
use crate::reference::ReferenceKind;
use crate::status::Status;
use crate::task::TaskDraft;
use crate::Result;

/// Whether the page creates a new project or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Create,
    Edit(ProjectId),
}

impl PageMode {
    /// Read the mode from a route query such as `?project_id=4` or `new=true`.
    ///
    /// `new=true` wins over a project id.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut project_id = None;
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "new" if value == "true" => return Some(Self::Create),
                "project_id" => project_id = value.parse().ok(),
                _ => {}
            }
        }
        project_id.map(Self::Edit)
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(*id),
        }
    }
}

/// Lifecycle of the project page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PagePhase {
    #[default]
    Uninitialized,
    DeterminingMode,
    /// Create mode, empty form
    FormReady,
    Loading,
    Loaded,
    LoadFailed(String),
    /// The project was deleted from this page
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TasksPhase {
    #[default]
    NotLoaded,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorStatuses {
    pub clients: SelectorStatus,
    pub teams: SelectorStatus,
    pub users: SelectorStatus,
}

impl SelectorStatuses {
    pub fn get(&self, kind: ReferenceKind) -> SelectorStatus {
        match kind {
            ReferenceKind::Clients => self.clients,
            ReferenceKind::Teams => self.teams,
            ReferenceKind::Users => self.users,
        }
    }

    pub fn set(&mut self, kind: ReferenceKind, status: SelectorStatus) {
        match kind {
            ReferenceKind::Clients => self.clients = status,
            ReferenceKind::Teams => self.teams = status,
            ReferenceKind::Users => self.users = status,
        }
    }
}

/// Editable fields of the project form
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
    pub status: Status,
    pub deadline: Option<NaiveDate>,
    pub description: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            client_id: None,
            team_id: None,
            status: Status::Pending,
            deadline: None,
            description: String::new(),
        }
    }
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client_id: project.client_id,
            team_id: project.team_id,
            status: project.status.clone(),
            deadline: project.deadline,
            description: project.description.clone().unwrap_or_default(),
        }
    }

    /// Validate and build the request body
    pub fn to_draft(&self) -> Result<ProjectDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Project name is required."));
        }
        let description = self.description.trim();
        Ok(ProjectDraft {
            name: name.to_string(),
            client_id: self.client_id,
            team_id: self.team_id,
            status: self.status.clone(),
            deadline: self.deadline,
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

/// The add-task form under the checklist
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub open: bool,
    pub name: String,
    pub description: String,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub status: Status,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            open: false,
            name: String::new(),
            description: String::new(),
            assignee_id: None,
            due_date: None,
            status: Status::ToDo,
        }
    }
}

impl TaskForm {
    /// Validate and build the request body
    pub fn to_draft(&self, project_id: ProjectId) -> Result<TaskDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Task name is required."));
        }
        Ok(TaskDraft {
            name: name.to_string(),
            project_id,
            description: self.description.trim().to_string(),
            assignee_id: self.assignee_id,
            due_date: self.due_date,
            status: self.status.clone(),
        })
    }
}

/// Entity an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    NewProject,
    Project(ProjectId),
    NewTask(ProjectId),
    Task(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Toggle,
    Delete,
}

/// One pending (entity, operation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InFlightKey {
    pub entity: EntityRef,
    pub op: Operation,
}

impl InFlightKey {
    pub fn new(entity: EntityRef, op: Operation) -> Self {
        Self { entity, op }
    }
}

/// Everything the project page knows
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub phase: PagePhase,
    pub mode: Option<PageMode>,
    pub cache: EntityCache,
    pub project_form: ProjectForm,
    pub task_form: TaskForm,
    pub selectors: SelectorStatuses,
    pub tasks_phase: TasksPhase,
    pub(crate) in_flight: HashSet<InFlightKey>,
    /// Status each optimistically toggled task held before the toggle
    pub(crate) pending_toggles: HashMap<TaskId, Status>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_create_mode(&self) -> bool {
        self.mode == Some(PageMode::Create)
    }

    /// Id of the project being edited, once it is known
    pub fn project_id(&self) -> Option<ProjectId> {
        self.mode.and_then(|mode| mode.project_id())
    }

    pub fn is_in_flight(&self, key: &InFlightKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Any operation pending on the entity, whatever its kind
    pub fn is_entity_busy(&self, entity: EntityRef) -> bool {
        self.in_flight.iter().any(|key| key.entity == entity)
    }

    pub fn is_task_busy(&self, id: TaskId) -> bool {
        self.is_entity_busy(EntityRef::Task(id))
    }

    pub fn has_pending_toggle(&self, id: TaskId) -> bool {
        self.pending_toggles.contains_key(&id)
    }

    /// Displayed checkbox state of a task
    pub fn is_checked(&self, id: TaskId) -> Option<bool> {
        self.cache.task(id).map(|task| task.is_completed())
    }
}
