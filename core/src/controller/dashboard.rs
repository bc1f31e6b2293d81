//! Project list controller

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::ProjectApi;
use crate::ids::ProjectId;
use crate::navigation::{Navigator, Route};
use crate::notifier::Notifier;
use crate::project::ProjectFilter;
use crate::view::{render_dashboard, DashboardState, DashboardView};
use crate::Result;

pub struct DashboardController {
    api: Arc<dyn ProjectApi>,
    notifier: Arc<Notifier>,
    navigator: Arc<dyn Navigator>,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn ProjectApi>,
        notifier: Arc<Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    /// Fetch the project list; returns how many projects matched
    pub async fn load(&self, filter: &ProjectFilter) -> Result<usize> {
        *self.state.write().await = DashboardState::Loading;

        match self.api.list_projects(filter).await {
            Ok(projects) => {
                let count = projects.len();
                info!("Loaded {} projects", count);
                *self.state.write().await = DashboardState::Loaded(projects);
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to load projects: {}", e);
                *self.state.write().await = DashboardState::Failed;
                if !e.is_auth() {
                    self.notifier
                        .show(format!("Error loading projects: {}", e.user_message()))
                        .await;
                }
                Err(e)
            }
        }
    }

    pub async fn view(&self) -> DashboardView {
        render_dashboard(&*self.state.read().await)
    }

    pub fn new_project(&self) {
        self.navigator.navigate(Route::NewProject);
    }

    pub fn open_project(&self, id: ProjectId) {
        self.navigator.navigate(Route::Project(id));
    }
}
