//! In-memory copy of the project being viewed
//!
//! Every load is a full replace. Nothing is merged field by field, so the
//! cache never mixes stale and fresh parts of one entity.

use tracing::warn;

use crate::error::Error;
use crate::ids::{ProjectId, TaskId};
use crate::project::Project;
use crate::reference::{ReferenceKind, ReferenceOption};
use crate::status::Status;
use crate::task::Task;
use crate::Result;

/// Selector collections loaded once per page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub clients: Vec<ReferenceOption>,
    pub teams: Vec<ReferenceOption>,
    pub users: Vec<ReferenceOption>,
}

impl ReferenceData {
    pub fn get(&self, kind: ReferenceKind) -> &[ReferenceOption] {
        match kind {
            ReferenceKind::Clients => &self.clients,
            ReferenceKind::Teams => &self.teams,
            ReferenceKind::Users => &self.users,
        }
    }

    pub fn set(&mut self, kind: ReferenceKind, options: Vec<ReferenceOption>) {
        match kind {
            ReferenceKind::Clients => self.clients = options,
            ReferenceKind::Teams => self.teams = options,
            ReferenceKind::Users => self.users = options,
        }
    }

    pub fn contains(&self, kind: ReferenceKind, id: i64) -> bool {
        self.get(kind).iter().any(|option| option.id == id)
    }
}

/// The current project, its ordered tasks and the reference collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityCache {
    current_project: Option<Project>,
    tasks: Vec<Task>,
    pub reference: ReferenceData,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project.as_ref()
    }

    pub fn current_project_id(&self) -> Option<ProjectId> {
        self.current_project.as_ref().map(|p| p.id)
    }

    pub fn current_project_mut(&mut self) -> Option<&mut Project> {
        self.current_project.as_mut()
    }

    /// Tasks in display order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the current project wholesale.
    ///
    /// Switching to another project drops the tasks of the previous one.
    pub fn replace_project(&mut self, project: Project) {
        if self.current_project_id() != Some(project.id) {
            self.tasks.clear();
        }
        self.current_project = Some(project);
    }

    /// Replace the task list wholesale, keeping server order.
    ///
    /// Tasks that belong to another project are dropped.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let project_id = self.current_project_id();
        self.tasks = tasks
            .into_iter()
            .filter(|task| {
                let owned = project_id.map_or(true, |id| task.project_id == id);
                if !owned {
                    warn!(
                        "Dropping task {} of project {} while viewing {:?}",
                        task.id, task.project_id, project_id
                    );
                }
                owned
            })
            .collect();
    }

    /// Replace a task in place, or append it when unknown.
    pub fn upsert_task(&mut self, task: Task) -> Result<()> {
        if let Some(project_id) = self.current_project_id() {
            if task.project_id != project_id {
                return Err(Error::validation(format!(
                    "Task {} belongs to project {}, not {}",
                    task.id, task.project_id, project_id
                )));
            }
        }

        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        Ok(())
    }

    /// Remove a task by id; returns the removed task. Absent ids are a no-op.
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Overwrite a task's status; returns the previous one
    pub fn set_task_status(&mut self, id: TaskId, status: Status) -> Option<Status> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        Some(std::mem::replace(&mut task.status, status))
    }

    /// Forget the project and its tasks; reference data stays.
    pub fn clear(&mut self) {
        self.current_project = None;
        self.tasks.clear();
    }
}
