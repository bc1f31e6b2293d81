//! Pure state transitions of the project page

use tracing::{debug, warn};

use super::state::*;
use crate::ids::TaskId;
use crate::project::Project;
use crate::reference::{ReferenceKind, ReferenceOption};
use crate::status::Status;
use crate::task::Task;

/// Something that happened on the page
#[derive(Debug, Clone)]
pub enum PageEvent {
    Initialize,
    ModeResolved(PageMode),
    ModeInvalid(String),
    ReferenceLoaded {
        kind: ReferenceKind,
        options: Vec<ReferenceOption>,
    },
    ReferenceFailed(ReferenceKind),
    ProjectLoaded(Project),
    ProjectLoadFailed(String),
    TasksLoaded(Vec<Task>),
    TasksLoadFailed,
    ProjectFormEdited(ProjectForm),
    ProjectStatusChanged(Status),
    ProjectDeleted,
    RequestStarted(InFlightKey),
    RequestFinished(InFlightKey),
    /// Optimistic flip, applied before the request is sent
    ToggleStarted {
        task_id: TaskId,
        checked: bool,
    },
    ToggleConfirmed {
        task_id: TaskId,
        task: Option<Task>,
    },
    ToggleFailed {
        task_id: TaskId,
    },
    /// A task created or updated on the server
    TaskStored(Task),
    TaskRemoved(TaskId),
    TaskFormOpened,
    TaskFormEdited(TaskForm),
    TaskFormClosed,
}

fn toggle_key(task_id: TaskId) -> InFlightKey {
    InFlightKey::new(EntityRef::Task(task_id), Operation::Toggle)
}

impl PageState {
    /// Compute the state after `event`
    pub fn apply(mut self, event: PageEvent) -> Self {
        match event {
            PageEvent::Initialize => {
                self.phase = PagePhase::DeterminingMode;
            }
            PageEvent::ModeResolved(mode) => {
                self.mode = Some(mode);
                match mode {
                    PageMode::Create => {
                        self.cache.clear();
                        self.project_form = ProjectForm::default();
                        self.task_form = TaskForm::default();
                        self.tasks_phase = TasksPhase::NotLoaded;
                        self.phase = PagePhase::FormReady;
                    }
                    PageMode::Edit(_) => {
                        self.phase = PagePhase::Loading;
                    }
                }
            }
            PageEvent::ModeInvalid(message) => {
                self.mode = None;
                self.phase = PagePhase::LoadFailed(message);
            }
            PageEvent::ReferenceLoaded { kind, options } => {
                self.cache.reference.set(kind, options);
                self.selectors.set(kind, SelectorStatus::Ready);
                self.retain_selection(kind);
            }
            PageEvent::ReferenceFailed(kind) => {
                self.cache.reference.set(kind, Vec::new());
                self.selectors.set(kind, SelectorStatus::Failed);
                self.retain_selection(kind);
            }
            PageEvent::ProjectLoaded(project) => {
                self.project_form = ProjectForm::from_project(&project);
                self.cache.replace_project(project);
                self.retain_selection(ReferenceKind::Clients);
                self.retain_selection(ReferenceKind::Teams);
                self.phase = PagePhase::Loaded;
            }
            PageEvent::ProjectLoadFailed(message) => {
                self.phase = PagePhase::LoadFailed(message);
            }
            PageEvent::TasksLoaded(tasks) => {
                self.cache.replace_tasks(tasks);
                self.tasks_phase = TasksPhase::Loaded;
            }
            PageEvent::TasksLoadFailed => {
                self.tasks_phase = TasksPhase::Failed;
            }
            PageEvent::ProjectFormEdited(form) => {
                self.project_form = form;
            }
            PageEvent::ProjectStatusChanged(status) => {
                if let Some(project) = self.cache.current_project_mut() {
                    project.status = status.clone();
                }
                self.project_form.status = status;
            }
            PageEvent::ProjectDeleted => {
                self.cache.clear();
                self.pending_toggles.clear();
                self.phase = PagePhase::Deleted;
            }
            PageEvent::RequestStarted(key) => {
                self.in_flight.insert(key);
            }
            PageEvent::RequestFinished(key) => {
                self.in_flight.remove(&key);
            }
            PageEvent::ToggleStarted { task_id, checked } => {
                if let Some(previous) =
                    self.cache.set_task_status(task_id, Status::for_checked(checked))
                {
                    self.pending_toggles.entry(task_id).or_insert(previous);
                    self.in_flight.insert(toggle_key(task_id));
                }
            }
            PageEvent::ToggleConfirmed { task_id, task } => {
                self.pending_toggles.remove(&task_id);
                self.in_flight.remove(&toggle_key(task_id));
                match task {
                    // Removed while the request was pending
                    Some(_) if self.cache.task(task_id).is_none() => {
                        debug!("Task {} no longer listed, dropping toggle result", task_id);
                    }
                    Some(task) => {
                        if let Err(e) = self.cache.upsert_task(task) {
                            warn!("Ignoring toggled task from server: {}", e);
                        }
                    }
                    None => {}
                }
            }
            PageEvent::ToggleFailed { task_id } => {
                if let Some(previous) = self.pending_toggles.remove(&task_id) {
                    self.cache.set_task_status(task_id, previous);
                }
                self.in_flight.remove(&toggle_key(task_id));
            }
            PageEvent::TaskStored(task) => {
                if let Err(e) = self.cache.upsert_task(task) {
                    warn!("Ignoring stored task: {}", e);
                }
            }
            PageEvent::TaskRemoved(task_id) => {
                self.cache.remove_task(task_id);
                self.pending_toggles.remove(&task_id);
            }
            PageEvent::TaskFormOpened => {
                self.task_form.open = true;
            }
            PageEvent::TaskFormEdited(form) => {
                self.task_form = form;
                self.retain_selection(ReferenceKind::Users);
            }
            PageEvent::TaskFormClosed => {
                self.task_form = TaskForm::default();
            }
        }
        self
    }

    /// Drop a selection whose id is not among the loaded options.
    ///
    /// Nothing is dropped while the options are still loading.
    fn retain_selection(&mut self, kind: ReferenceKind) {
        if self.selectors.get(kind) == SelectorStatus::Pending {
            return;
        }
        let reference = &self.cache.reference;
        match kind {
            ReferenceKind::Clients => {
                self.project_form.client_id = self
                    .project_form
                    .client_id
                    .filter(|id| reference.contains(kind, id.0));
            }
            ReferenceKind::Teams => {
                self.project_form.team_id = self
                    .project_form
                    .team_id
                    .filter(|id| reference.contains(kind, id.0));
            }
            ReferenceKind::Users => {
                self.task_form.assignee_id = self
                    .task_form
                    .assignee_id
                    .filter(|id| reference.contains(kind, id.0));
            }
        }
    }
}
