//! Page routes and the seams to the hosting shell
//!
//! Navigation and confirmation prompts are owned by whatever hosts the pages
//! (a browser, a terminal). Controllers only talk to these traits.

use std::fmt;

use crate::ids::ProjectId;

/// A navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    NewProject,
    Project(ProjectId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login_page".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::NewProject => "/scheda-sito?new=true".to_string(),
            Self::Project(id) => format!("/scheda-sito?project_id={}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Performs page navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Synchronous yes/no prompt shown before destructive operations
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Schedule a fire-and-forget navigation after `delay`.
///
/// The timer is never cancelled; navigating elsewhere first makes it harmless.
pub fn navigate_after(
    navigator: std::sync::Arc<dyn Navigator>,
    route: Route,
    delay: std::time::Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::debug!("Navigating to {}", route);
        navigator.navigate(route);
    });
}
