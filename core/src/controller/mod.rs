//! Page controllers
//!
//! Controllers coordinate local state changes with their remote
//! counterparts. They hold the shared page state, never a module global.

mod dashboard;
mod project;

pub use dashboard::DashboardController;
pub use project::{PageTimings, ProjectController, SharedPageState, SubmitOutcome};
