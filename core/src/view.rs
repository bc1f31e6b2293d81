//! Rendering layer
//!
//! Pure functions from state to view models. Front-ends only draw what these
//! return.

use serde::Serialize;

use crate::cache::ReferenceData;
use crate::ids::{ProjectId, TaskId};
use crate::navigation::Route;
use crate::page::{PageMode, PagePhase, PageState, SelectorStatus, TasksPhase};
use crate::project::Project;
use crate::reference::{ReferenceKind, ReferenceOption};
use crate::status::{BadgeTone, Status};
use crate::task::Task;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeView {
    pub label: String,
    pub tone: BadgeTone,
}

impl From<&Status> for BadgeView {
    fn from(status: &Status) -> Self {
        Self {
            label: status.as_str().to_string(),
            tone: status.tone(),
        }
    }
}

/// One checklist row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRowView {
    pub id: TaskId,
    pub name: String,
    pub checked: bool,
    pub struck_through: bool,
    pub badge: BadgeView,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub assignee: Option<String>,
    /// A request for this task is pending
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChecklistView {
    /// Create mode: tasks need a saved project
    SaveFirst,
    Loading,
    Empty,
    Failed,
    Rows(Vec<TaskRowView>),
}

impl ChecklistView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::SaveFirst => Some("Save the project to add tasks."),
            Self::Loading => Some("Loading tasks..."),
            Self::Empty => Some("No tasks for this project. Use \"Add task\" to create one."),
            Self::Failed => Some("Error loading tasks."),
            Self::Rows(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorView {
    pub placeholder: &'static str,
    pub options: Vec<ReferenceOption>,
    pub selected: Option<i64>,
}

impl SelectorView {
    fn build(
        kind: ReferenceKind,
        status: SelectorStatus,
        reference: &ReferenceData,
        selected: Option<i64>,
    ) -> Self {
        let placeholder = match status {
            SelectorStatus::Failed => kind.failed_placeholder(),
            SelectorStatus::Pending | SelectorStatus::Ready => kind.placeholder(),
        };
        Self {
            placeholder,
            options: reference.get(kind).to_vec(),
            selected,
        }
    }

    /// Label of the selected option, if it is present
    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected?;
        self.options
            .iter()
            .find(|option| option.id == selected)
            .map(|option| option.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFormView {
    pub name: String,
    pub status: String,
    /// `YYYY-MM-DD`, empty when there is no deadline
    pub deadline: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPageView {
    pub title: String,
    pub error: Option<String>,
    pub form: ProjectFormView,
    pub clients: SelectorView,
    pub teams: SelectorView,
    pub assignees: SelectorView,
    pub save_label: &'static str,
    pub show_delete: bool,
    pub show_mark_completed: bool,
    pub show_add_task: bool,
    pub task_form_open: bool,
    pub checklist: ChecklistView,
}

pub fn render_task_row(task: &Task, disabled: bool) -> TaskRowView {
    let completed = task.is_completed();
    TaskRowView {
        id: task.id,
        name: task.name.clone(),
        checked: completed,
        struck_through: completed,
        badge: BadgeView::from(&task.status),
        description: task.description.clone().filter(|d| !d.is_empty()),
        due_date: task.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
        assignee: task.assignee_name.clone(),
        disabled,
    }
}

/// Render the project page
pub fn render_project_page(state: &PageState) -> ProjectPageView {
    let editing = matches!(state.mode, Some(PageMode::Edit(_)));
    let loaded = editing && state.phase == PagePhase::Loaded;
    let completed = state
        .cache
        .current_project()
        .map_or(false, Project::is_completed);

    let form = &state.project_form;
    let reference = &state.cache.reference;

    let checklist = if state.is_create_mode() {
        ChecklistView::SaveFirst
    } else {
        match state.tasks_phase {
            TasksPhase::NotLoaded => ChecklistView::Loading,
            TasksPhase::Failed => ChecklistView::Failed,
            TasksPhase::Loaded if state.cache.tasks().is_empty() => ChecklistView::Empty,
            TasksPhase::Loaded => ChecklistView::Rows(
                state
                    .cache
                    .tasks()
                    .iter()
                    .map(|task| render_task_row(task, state.is_task_busy(task.id)))
                    .collect(),
            ),
        }
    };

    let title = match state.mode {
        Some(PageMode::Create) => "New project".to_string(),
        _ => state
            .cache
            .current_project()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Project".to_string()),
    };

    let error = match &state.phase {
        PagePhase::LoadFailed(message) => Some(message.clone()),
        _ => None,
    };

    ProjectPageView {
        title,
        error,
        form: ProjectFormView {
            name: form.name.clone(),
            status: form.status.as_str().to_string(),
            deadline: form
                .deadline
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            description: form.description.clone(),
        },
        clients: SelectorView::build(
            ReferenceKind::Clients,
            state.selectors.clients,
            reference,
            form.client_id.map(|id| id.0),
        ),
        teams: SelectorView::build(
            ReferenceKind::Teams,
            state.selectors.teams,
            reference,
            form.team_id.map(|id| id.0),
        ),
        assignees: SelectorView::build(
            ReferenceKind::Users,
            state.selectors.users,
            reference,
            state.task_form.assignee_id.map(|id| id.0),
        ),
        save_label: if editing { "Save changes" } else { "Create project" },
        show_delete: loaded,
        show_mark_completed: loaded && !completed,
        show_add_task: loaded,
        task_form_open: loaded && state.task_form.open,
        checklist,
    }
}

/// Project list page
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardState {
    #[default]
    Loading,
    Loaded(Vec<Project>),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCardView {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub team: String,
    pub status: String,
    pub deadline: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub active_count: Option<usize>,
    pub message: Option<&'static str>,
    pub cards: Vec<ProjectCardView>,
}

pub fn render_project_card(project: &Project) -> ProjectCardView {
    ProjectCardView {
        id: project.id,
        name: project.name.clone(),
        client: project
            .client_id
            .map_or_else(|| NOT_AVAILABLE.to_string(), |id| id.to_string()),
        team: project
            .team_id
            .map_or_else(|| NOT_AVAILABLE.to_string(), |id| id.to_string()),
        status: project.status.as_str().to_string(),
        deadline: project
            .deadline
            .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.format(DATE_FORMAT).to_string()),
        link: Route::Project(project.id).path(),
    }
}

/// Render the project list
pub fn render_dashboard(state: &DashboardState) -> DashboardView {
    match state {
        DashboardState::Loading => DashboardView {
            active_count: None,
            message: Some("Loading projects..."),
            cards: Vec::new(),
        },
        DashboardState::Failed => DashboardView {
            active_count: None,
            message: Some("Error loading projects."),
            cards: Vec::new(),
        },
        DashboardState::Loaded(projects) => DashboardView {
            active_count: Some(projects.len()),
            message: projects.is_empty().then_some("No projects found."),
            cards: projects.iter().map(render_project_card).collect(),
        },
    }
}
