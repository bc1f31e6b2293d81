use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use scheda_core::dates::parse_date;
use scheda_core::ids::{ClientId, ProjectId, TaskId, TeamId, UserId};
use scheda_core::status::Status;

#[derive(Parser)]
#[command(name = "scheda", about = "Projects and tasks from the terminal", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides SCHEDA_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Print view models as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check credentials against the server
    Login(LoginArgs),
    /// End the server session
    Logout,
    /// List projects
    Projects(ProjectsArgs),
    /// Show a project with its checklist
    Show(ProjectArg),
    /// Create a project
    New(NewArgs),
    /// Update a project
    Edit(EditArgs),
    /// Mark a project as completed
    Complete(ProjectArg),
    /// Delete a project
    Delete(ProjectArg),
    /// Add a task to a project
    AddTask(AddTaskArgs),
    /// Flip a task between completed and in progress
    Toggle(TaskArgs),
    /// Delete a task
    DeleteTask(TaskArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Defaults to SCHEDA_USERNAME
    #[arg(short, long)]
    pub username: Option<String>,
    /// Defaults to SCHEDA_PASSWORD
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ProjectsArgs {
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
    #[arg(long)]
    pub client: Option<ClientId>,
    #[arg(long)]
    pub team: Option<TeamId>,
}

#[derive(Args)]
pub struct ProjectArg {
    pub project: ProjectId,
}

#[derive(Args)]
pub struct ProjectFields {
    #[arg(long)]
    pub client: Option<ClientId>,
    /// Leave the project without a client
    #[arg(long, conflicts_with = "client")]
    pub no_client: bool,
    #[arg(long)]
    pub team: Option<TeamId>,
    /// Leave the project without a team
    #[arg(long, conflicts_with = "team")]
    pub no_team: bool,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    pub deadline: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(long)]
    pub name: String,
    #[command(flatten)]
    pub fields: ProjectFields,
}

#[derive(Args)]
pub struct EditArgs {
    pub project: ProjectId,
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub fields: ProjectFields,
}

#[derive(Args)]
pub struct AddTaskArgs {
    pub project: ProjectId,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub assignee: Option<UserId>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date_arg)]
    pub due: Option<NaiveDate>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
}

#[derive(Args)]
pub struct TaskArgs {
    pub project: ProjectId,
    pub task: TaskId,
}

fn parse_status(raw: &str) -> Result<Status, String> {
    match Status::parse(raw) {
        Status::Other(value) if value.trim().is_empty() => Err("status cannot be empty".into()),
        status => Ok(status),
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}
