//! Command handlers
//!
//! Each command opens the page it belongs to, drives its controller, then
//! prints the resulting view.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use scheda_client::ApiClient;
use scheda_core::api::ProjectApi;
use scheda_core::auth::Credentials;
use scheda_core::controller::{DashboardController, PageTimings, ProjectController, SubmitOutcome};
use scheda_core::ids::{ProjectId, TaskId};
use scheda_core::navigation::Route;
use scheda_core::notifier::Notifier;
use scheda_core::page::{PageState, ProjectForm};
use scheda_core::project::ProjectFilter;
use scheda_core::view::ChecklistView;

use crate::cli::{
    AddTaskArgs, Commands, EditArgs, LoginArgs, NewArgs, ProjectFields, ProjectsArgs, TaskArgs,
};
use crate::config::Config;
use crate::output;
use crate::terminal::{PromptConfirm, RouteRecorder, TerminalSurface};

/// Slack on top of a redirect delay before giving up on the navigation
const NAVIGATION_SLACK: Duration = Duration::from_millis(500);

pub struct App {
    config: Config,
    api: Arc<ApiClient>,
    notifier: Arc<Notifier>,
    navigator: Arc<RouteRecorder>,
    confirm: Arc<PromptConfirm>,
    timings: PageTimings,
    json: bool,
}

impl App {
    pub fn new(config: Config, json: bool) -> anyhow::Result<Self> {
        let notifier = Arc::new(
            Notifier::new(Arc::new(TerminalSurface)).with_duration(config.notice_duration),
        );
        let navigator = Arc::new(RouteRecorder::default());
        let api = ApiClient::new(config.client_config(), notifier.clone(), navigator.clone())
            .context("Failed to create API client")?;
        let defaults = PageTimings::default();
        let timings = PageTimings {
            create_redirect: defaults.create_redirect.min(config.redirect_delay),
            delete_redirect: config.redirect_delay,
        };

        Ok(Self {
            confirm: Arc::new(PromptConfirm::new(config.assume_yes)),
            api: Arc::new(api),
            notifier,
            navigator,
            timings,
            json,
            config,
        })
    }

    pub async fn run(&self, command: Commands) -> anyhow::Result<()> {
        let result = self.dispatch(command).await;
        if let Err(err) = &result {
            if err
                .downcast_ref::<scheda_core::Error>()
                .is_some_and(scheda_core::Error::is_auth)
            {
                if let Some(route) = self.follow(self.config.redirect_delay).await {
                    eprintln!(
                        "→ {}: run `scheda login` or set SCHEDA_USERNAME and SCHEDA_PASSWORD",
                        route
                    );
                }
            }
        }
        result
    }

    async fn dispatch(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Login(args) => self.login(args).await,
            Commands::Logout => {
                self.api.logout().await?;
                println!("Logged out.");
                Ok(())
            }
            Commands::Projects(args) => {
                self.resume_session().await?;
                self.projects(args).await
            }
            command => {
                self.resume_session().await?;
                self.page_command(command).await
            }
        }
    }

    async fn page_command(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Show(args) => self.show(args.project).await,
            Commands::New(args) => self.create(args).await,
            Commands::Edit(args) => self.edit(args).await,
            Commands::Complete(args) => self.complete(args.project).await,
            Commands::Delete(args) => self.delete(args.project).await,
            Commands::AddTask(args) => self.add_task(args).await,
            Commands::Toggle(args) => self.toggle(args).await,
            Commands::DeleteTask(args) => self.delete_task(args).await,
            Commands::Login(_) | Commands::Logout | Commands::Projects(_) => {
                bail!("Not a project page command")
            }
        }
    }

    /// Log in with the configured credentials, when there are any.
    ///
    /// Every invocation is a fresh process, so the session cookie has to be
    /// obtained again each time.
    async fn resume_session(&self) -> anyhow::Result<()> {
        let Some((username, password)) = self.config.credentials() else {
            debug!("No configured credentials, continuing without login");
            return Ok(());
        };
        let credentials = Credentials::new(username, password)?;
        self.api.login(&credentials).await?;
        Ok(())
    }

    async fn login(&self, args: LoginArgs) -> anyhow::Result<()> {
        let username = args
            .username
            .or_else(|| self.config.username.clone())
            .unwrap_or_default();
        let password = args
            .password
            .or_else(|| self.config.password.clone())
            .unwrap_or_default();

        let credentials = match Credentials::new(&username, &password) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.notifier.show(e.user_message()).await;
                return Err(e.into());
            }
        };
        let user = self.api.login(&credentials).await?;
        println!(
            "Logged in as {}",
            user.name.as_deref().unwrap_or(&user.username)
        );
        Ok(())
    }

    async fn follow(&self, delay: Duration) -> Option<Route> {
        self.navigator.wait(delay + NAVIGATION_SLACK).await
    }

    fn print<T: serde::Serialize>(&self, view: &T, text: String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(view)?);
        } else {
            print!("{}", text);
        }
        Ok(())
    }

    async fn projects(&self, args: ProjectsArgs) -> anyhow::Result<()> {
        let api: Arc<dyn ProjectApi> = self.api.clone();
        let controller =
            DashboardController::new(api, self.notifier.clone(), self.navigator.clone());
        let filter = ProjectFilter {
            status: args.status,
            client_id: args.client,
            team_id: args.team,
        };

        controller.load(&filter).await?;
        let view = controller.view().await;
        self.print(&view, output::dashboard(&view))
    }

    /// Build a project page controller and load it from `query`
    async fn open_page(&self, query: &str) -> anyhow::Result<ProjectController> {
        let api: Arc<dyn ProjectApi> = self.api.clone();
        let controller = ProjectController::new(
            Arc::new(RwLock::new(PageState::new())),
            api,
            self.notifier.clone(),
            self.navigator.clone(),
            self.confirm.clone(),
        )
        .with_timings(self.timings);
        controller.initialize(query).await?;
        Ok(controller)
    }

    async fn open_project(&self, id: ProjectId) -> anyhow::Result<ProjectController> {
        self.open_page(&format!("project_id={}", id)).await
    }

    async fn print_page(&self, controller: &ProjectController) -> anyhow::Result<()> {
        let view = controller.view().await;
        self.print(&view, output::project_page(&view))
    }

    async fn show(&self, id: ProjectId) -> anyhow::Result<()> {
        let controller = self.open_project(id).await?;
        self.print_page(&controller).await
    }

    async fn create(&self, args: NewArgs) -> anyhow::Result<()> {
        let controller = self.open_page("new=true").await?;
        controller
            .edit_project_form(|form| {
                form.name = args.name;
                apply_fields(form, args.fields);
            })
            .await;

        let SubmitOutcome::Created(project) = controller.submit_project().await? else {
            bail!("Project was updated instead of created");
        };
        info!("Created project {}", project.id);
        if let Some(route) = self.follow(self.timings.create_redirect).await {
            debug!("Following redirect to {}", route);
        }
        let controller = self.open_project(project.id).await?;
        self.print_page(&controller).await
    }

    async fn edit(&self, args: EditArgs) -> anyhow::Result<()> {
        if args.name.is_none() && !args.fields.any() {
            bail!("Nothing to change: pass at least one field to update");
        }
        let controller = self.open_project(args.project).await?;
        controller
            .edit_project_form(|form| {
                if let Some(name) = args.name {
                    form.name = name;
                }
                apply_fields(form, args.fields);
            })
            .await;

        controller.submit_project().await?;
        self.print_page(&controller).await
    }

    async fn complete(&self, id: ProjectId) -> anyhow::Result<()> {
        let controller = self.open_project(id).await?;
        if !controller.mark_completed().await? {
            println!("Cancelled.");
            return Ok(());
        }
        self.print_page(&controller).await
    }

    async fn delete(&self, id: ProjectId) -> anyhow::Result<()> {
        let controller = self.open_project(id).await?;
        if !controller.delete_project().await? {
            println!("Cancelled.");
            return Ok(());
        }

        let next = self.follow(self.timings.delete_redirect).await;
        if self.json {
            println!(
                "{}",
                json!({ "deleted": id, "next": next.map(|route| route.path()) })
            );
        } else if let Some(route) = next {
            println!("Project {} deleted. → {}", id, route);
        } else {
            println!("Project {} deleted.", id);
        }
        Ok(())
    }

    async fn add_task(&self, args: AddTaskArgs) -> anyhow::Result<()> {
        let controller = self.open_project(args.project).await?;
        controller.open_task_form().await?;
        controller
            .edit_task_form(|form| {
                form.name = args.name;
                form.description = args.description.unwrap_or_default();
                form.assignee_id = args.assignee;
                form.due_date = args.due;
                if let Some(status) = args.status {
                    form.status = status;
                }
            })
            .await;

        controller.submit_task().await?;
        self.print_page(&controller).await
    }

    async fn toggle(&self, args: TaskArgs) -> anyhow::Result<()> {
        let controller = self.open_project(args.project).await?;
        controller.toggle_task(args.task).await?;
        self.print_row(&controller, args.task).await
    }

    async fn delete_task(&self, args: TaskArgs) -> anyhow::Result<()> {
        let controller = self.open_project(args.project).await?;
        if !controller.delete_task(args.task).await? {
            println!("Cancelled.");
            return Ok(());
        }
        self.print_page(&controller).await
    }

    async fn print_row(&self, controller: &ProjectController, id: TaskId) -> anyhow::Result<()> {
        let ChecklistView::Rows(rows) = controller.view().await.checklist else {
            bail!("Tasks are not available");
        };
        let row = rows
            .into_iter()
            .find(|row| row.id == id)
            .with_context(|| format!("Task {} not found", id))?;
        self.print(&row, format!("{}\n", output::task_row(&row)))
    }
}

impl ProjectFields {
    fn any(&self) -> bool {
        self.client.is_some()
            || self.no_client
            || self.team.is_some()
            || self.no_team
            || self.status.is_some()
            || self.deadline.is_some()
            || self.description.is_some()
    }
}

fn apply_fields(form: &mut ProjectForm, fields: ProjectFields) {
    if fields.no_client {
        form.client_id = None;
    } else if let Some(client) = fields.client {
        form.client_id = Some(client);
    }
    if fields.no_team {
        form.team_id = None;
    } else if let Some(team) = fields.team {
        form.team_id = Some(team);
    }
    if let Some(status) = fields.status {
        form.status = status;
    }
    if let Some(deadline) = fields.deadline {
        form.deadline = Some(deadline);
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
}
