//! Project page controller
//!
//! Task completion toggles are optimistic: the checkbox flips before the
//! request is sent and is rolled back if the request fails. Everything else
//! waits for the server and reloads from it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::ProjectApi;
use crate::error::Error;
use crate::ids::{ProjectId, TaskId};
use crate::navigation::{navigate_after, Confirm, Navigator, Route};
use crate::notifier::Notifier;
use crate::page::{
    EntityRef, InFlightKey, Operation, PageEvent, PageMode, PageState, ProjectForm, TaskForm,
};
use crate::project::{Project, ProjectPatch};
use crate::reference::ReferenceLoader;
use crate::status::Status;
use crate::task::{Task, TaskPatch};
use crate::view::{render_project_page, ProjectPageView};
use crate::Result;

pub type SharedPageState = Arc<RwLock<PageState>>;

/// Delays before navigating away after a mutation
#[derive(Debug, Clone, Copy)]
pub struct PageTimings {
    pub create_redirect: Duration,
    pub delete_redirect: Duration,
}

impl Default for PageTimings {
    fn default() -> Self {
        Self {
            create_redirect: Duration::from_millis(1500),
            delete_redirect: Duration::from_secs(2),
        }
    }
}

/// Result of submitting the project form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Project),
    Updated,
}

pub struct ProjectController {
    state: SharedPageState,
    api: Arc<dyn ProjectApi>,
    notifier: Arc<Notifier>,
    navigator: Arc<dyn Navigator>,
    confirm: Arc<dyn Confirm>,
    references: ReferenceLoader,
    timings: PageTimings,
}

impl ProjectController {
    pub fn new(
        state: SharedPageState,
        api: Arc<dyn ProjectApi>,
        notifier: Arc<Notifier>,
        navigator: Arc<dyn Navigator>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let references = ReferenceLoader::new(Arc::clone(&api), Arc::clone(&notifier));
        Self {
            state,
            api,
            notifier,
            navigator,
            confirm,
            references,
            timings: PageTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: PageTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn state(&self) -> SharedPageState {
        Arc::clone(&self.state)
    }

    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> ProjectPageView {
        render_project_page(&*self.state.read().await)
    }

    async fn dispatch(&self, event: PageEvent) {
        let mut state = self.state.write().await;
        let current = std::mem::take(&mut *state);
        *state = current.apply(event);
    }

    /// Mark `key` in flight, refusing if it already is
    async fn begin(&self, key: InFlightKey) -> Result<()> {
        let mut state = self.state.write().await;
        if state.is_entity_busy(key.entity) {
            debug!("Rejecting {:?}: entity busy", key);
            return Err(Error::InFlight(format!("{:?} {:?}", key.op, key.entity)));
        }
        let current = std::mem::take(&mut *state);
        *state = current.apply(PageEvent::RequestStarted(key));
        Ok(())
    }

    async fn finish(&self, key: InFlightKey) {
        self.dispatch(PageEvent::RequestFinished(key)).await;
    }

    /// Show a client-side error and hand it back
    async fn reject(&self, error: Error) -> Error {
        self.notifier.show(error.user_message()).await;
        error
    }

    /// Determine the mode from a route query and load the page
    pub async fn initialize(&self, query: &str) -> Result<()> {
        self.dispatch(PageEvent::Initialize).await;

        let Some(mode) = PageMode::from_query(query) else {
            let message = "Project id not specified or invalid mode.";
            self.dispatch(PageEvent::ModeInvalid(message.to_string()))
                .await;
            return Err(self.reject(Error::validation(message)).await);
        };
        self.dispatch(PageEvent::ModeResolved(mode)).await;
        self.load_references().await;

        match mode {
            PageMode::Create => {
                info!("Project page ready in create mode");
                Ok(())
            }
            PageMode::Edit(id) => {
                let project = self.load_project(id).await;
                // Tasks load even when the project failed
                if let Err(e) = self.load_tasks(id).await {
                    debug!("Tasks for project {} not loaded: {}", id, e);
                }
                project
            }
        }
    }

    /// Fill the client, team and assignee selectors
    pub async fn load_references(&self) {
        let set = self.references.load_all().await;
        for (kind, result) in set.into_results() {
            let event = match result {
                Ok(options) => PageEvent::ReferenceLoaded { kind, options },
                Err(_) => PageEvent::ReferenceFailed(kind),
            };
            self.dispatch(event).await;
        }
    }

    /// Replace the cached project with the server's copy
    pub async fn load_project(&self, id: ProjectId) -> Result<()> {
        match self.api.get_project(id).await {
            Ok(project) => {
                debug!("Loaded project {}", id);
                self.dispatch(PageEvent::ProjectLoaded(project)).await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load project {}: {}", id, e);
                let message = format!("Error loading project details: {}", e.user_message());
                self.dispatch(PageEvent::ProjectLoadFailed(message.clone()))
                    .await;
                self.notifier.show(message).await;
                Err(e)
            }
        }
    }

    /// Replace the cached task list with the server's
    pub async fn load_tasks(&self, project_id: ProjectId) -> Result<()> {
        match self.api.list_tasks(project_id).await {
            Ok(tasks) => {
                debug!("Loaded {} tasks for project {}", tasks.len(), project_id);
                self.dispatch(PageEvent::TasksLoaded(tasks)).await;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load tasks for project {}: {}", project_id, e);
                self.dispatch(PageEvent::TasksLoadFailed).await;
                Err(e)
            }
        }
    }

    /// Edit the project form in place
    pub async fn edit_project_form(&self, edit: impl FnOnce(&mut ProjectForm)) {
        let mut form = self.state.read().await.project_form.clone();
        edit(&mut form);
        self.dispatch(PageEvent::ProjectFormEdited(form)).await;
    }

    /// Create or update the project from the form
    pub async fn submit_project(&self) -> Result<SubmitOutcome> {
        let (mode, form) = {
            let state = self.state.read().await;
            (state.mode, state.project_form.clone())
        };
        let Some(mode) = mode else {
            return Err(self
                .reject(Error::validation("Project id not specified or invalid mode."))
                .await);
        };
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => return Err(self.reject(e).await),
        };

        match mode {
            PageMode::Create => {
                let key = InFlightKey::new(EntityRef::NewProject, Operation::Create);
                self.begin(key).await?;
                let created = self.api.create_project(&draft).await;
                self.finish(key).await;

                let project = created?;
                info!("Created project {} ({})", project.id, project.name);
                self.notifier.show("Project created successfully!").await;
                navigate_after(
                    Arc::clone(&self.navigator),
                    Route::Project(project.id),
                    self.timings.create_redirect,
                );
                Ok(SubmitOutcome::Created(project))
            }
            PageMode::Edit(id) => {
                let key = InFlightKey::new(EntityRef::Project(id), Operation::Update);
                self.begin(key).await?;
                let updated = self
                    .api
                    .update_project(id, &ProjectPatch::from(draft))
                    .await;
                self.finish(key).await;

                updated?;
                info!("Updated project {}", id);
                self.notifier.show("Project updated successfully!").await;
                self.load_project(id).await?;
                Ok(SubmitOutcome::Updated)
            }
        }
    }

    /// Flip a task's completion checkbox.
    ///
    /// The flip shows immediately. A failed request restores the previous
    /// status; nothing is retried. Returns the status that was sent.
    pub async fn toggle_task(&self, task_id: TaskId) -> Result<Status> {
        let checked = {
            let mut state = self.state.write().await;
            let Some(was_checked) = state.is_checked(task_id) else {
                return Err(Error::NotFound(format!("Task {} not found", task_id)));
            };
            if state.has_pending_toggle(task_id) || state.is_task_busy(task_id) {
                return Err(Error::InFlight(format!("Task {} is being updated", task_id)));
            }
            let current = std::mem::take(&mut *state);
            *state = current.apply(PageEvent::ToggleStarted {
                task_id,
                checked: !was_checked,
            });
            !was_checked
        };

        let status = Status::for_checked(checked);
        match self
            .api
            .update_task(task_id, &TaskPatch::status(status.clone()))
            .await
        {
            Ok(task) => {
                self.dispatch(PageEvent::ToggleConfirmed { task_id, task })
                    .await;
                info!("Task {} set to {}", task_id, status);
                self.notifier
                    .show(format!("Task {} updated to {}.", task_id, status))
                    .await;
                Ok(status)
            }
            Err(e) => {
                self.dispatch(PageEvent::ToggleFailed { task_id }).await;
                warn!("Reverted task {} after failed update: {}", task_id, e);
                self.notifier
                    .show(format!(
                        "Error updating task {}: {}",
                        task_id,
                        e.user_message()
                    ))
                    .await;
                Err(e)
            }
        }
    }

    /// Send a partial update for a task and store the result
    pub async fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> Result<()> {
        let key = InFlightKey::new(EntityRef::Task(task_id), Operation::Update);
        self.begin(key).await?;
        let updated = self.api.update_task(task_id, &patch).await;
        self.finish(key).await;

        match updated? {
            Some(task) => self.dispatch(PageEvent::TaskStored(task)).await,
            None => {
                if let Some(project_id) = self.state.read().await.project_id() {
                    self.load_tasks(project_id).await?;
                }
            }
        }
        info!("Updated task {}", task_id);
        Ok(())
    }

    /// Show the add-task form; refused until the project exists
    pub async fn open_task_form(&self) -> Result<()> {
        if self.state.read().await.is_create_mode() {
            return Err(self
                .reject(Error::validation("Save the project before adding tasks."))
                .await);
        }
        self.dispatch(PageEvent::TaskFormOpened).await;
        Ok(())
    }

    pub async fn edit_task_form(&self, edit: impl FnOnce(&mut TaskForm)) {
        let mut form = self.state.read().await.task_form.clone();
        edit(&mut form);
        self.dispatch(PageEvent::TaskFormEdited(form)).await;
    }

    /// Hide and reset the add-task form
    pub async fn cancel_task_form(&self) {
        self.dispatch(PageEvent::TaskFormClosed).await;
    }

    /// Create a task from the add-task form
    pub async fn submit_task(&self) -> Result<Task> {
        let (project_id, form) = {
            let state = self.state.read().await;
            let project_id = state
                .project_id()
                .filter(|id| state.cache.current_project_id() == Some(*id));
            (project_id, state.task_form.clone())
        };
        let Some(project_id) = project_id else {
            return Err(self
                .reject(Error::validation("Project id unavailable for adding tasks."))
                .await);
        };
        let draft = match form.to_draft(project_id) {
            Ok(draft) => draft,
            Err(e) => return Err(self.reject(e).await),
        };

        let key = InFlightKey::new(EntityRef::NewTask(project_id), Operation::Create);
        self.begin(key).await?;
        let created = self.api.create_task(project_id, &draft).await;
        self.finish(key).await;

        match created {
            Ok(task) => {
                info!("Created task {} in project {}", task.id, project_id);
                self.dispatch(PageEvent::TaskStored(task.clone())).await;
                self.dispatch(PageEvent::TaskFormClosed).await;
                self.notifier.show("New task added successfully.").await;
                Ok(task)
            }
            Err(e) => {
                self.notifier
                    .show(format!("Error creating task: {}", e.user_message()))
                    .await;
                Err(e)
            }
        }
    }

    /// Delete a task after confirmation. `Ok(false)` when declined.
    pub async fn delete_task(&self, task_id: TaskId) -> Result<bool> {
        if !self
            .confirm
            .confirm(&format!("Are you sure you want to delete task {}?", task_id))
        {
            debug!("Deletion of task {} declined", task_id);
            return Ok(false);
        }

        let key = InFlightKey::new(EntityRef::Task(task_id), Operation::Delete);
        self.begin(key).await?;
        let deleted = self.api.delete_task(task_id).await;
        self.finish(key).await;

        match deleted {
            Ok(()) => {
                info!("Deleted task {}", task_id);
                self.dispatch(PageEvent::TaskRemoved(task_id)).await;
                self.notifier.show(format!("Task {} deleted.", task_id)).await;
                Ok(true)
            }
            Err(e) => {
                self.notifier
                    .show(format!(
                        "Error deleting task {}: {}",
                        task_id,
                        e.user_message()
                    ))
                    .await;
                Err(e)
            }
        }
    }

    /// Delete the project after confirmation, then go to the dashboard
    pub async fn delete_project(&self) -> Result<bool> {
        let Some(project_id) = self.state.read().await.project_id() else {
            return Ok(false);
        };
        if !self.confirm.confirm(&format!(
            "Are you sure you want to delete this project ({})? This cannot be undone.",
            project_id
        )) {
            debug!("Deletion of project {} declined", project_id);
            return Ok(false);
        }

        let key = InFlightKey::new(EntityRef::Project(project_id), Operation::Delete);
        self.begin(key).await?;
        let deleted = self.api.delete_project(project_id).await;
        self.finish(key).await;

        match deleted {
            Ok(()) => {
                info!("Deleted project {}", project_id);
                self.dispatch(PageEvent::ProjectDeleted).await;
                self.notifier
                    .show("Project deleted. You will be redirected to the dashboard.")
                    .await;
                navigate_after(
                    Arc::clone(&self.navigator),
                    Route::Dashboard,
                    self.timings.delete_redirect,
                );
                Ok(true)
            }
            Err(e) => {
                self.notifier
                    .show(format!("Error deleting project: {}", e.user_message()))
                    .await;
                Err(e)
            }
        }
    }

    /// Set the project status to `Completato` after confirmation
    pub async fn mark_completed(&self) -> Result<bool> {
        let Some(project_id) = self.state.read().await.project_id() else {
            return Ok(false);
        };
        if !self
            .confirm
            .confirm("Are you sure you want to mark this project as Completato?")
        {
            return Ok(false);
        }

        let key = InFlightKey::new(EntityRef::Project(project_id), Operation::Update);
        self.begin(key).await?;
        let updated = self
            .api
            .update_project(project_id, &ProjectPatch::status(Status::Completed))
            .await;
        self.finish(key).await;

        match updated {
            Ok(_) => {
                info!("Project {} marked as completed", project_id);
                self.dispatch(PageEvent::ProjectStatusChanged(Status::Completed))
                    .await;
                self.notifier.show("Project marked as Completato.").await;
                Ok(true)
            }
            Err(e) => {
                self.notifier
                    .show(format!(
                        "Error marking the project as completed: {}",
                        e.user_message()
                    ))
                    .await;
                Err(e)
            }
        }
    }
}
