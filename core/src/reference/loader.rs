//! Reference data loader
//!
//! Each collection loads on its own: a failing endpoint is reported and
//! leaves its selector with only the placeholder, the others still populate.

use std::sync::Arc;

use tracing::{debug, warn};

use super::model::{ReferenceKind, ReferenceOption};
use crate::api::ProjectApi;
use crate::notifier::Notifier;
use crate::Result;

/// Outcome of loading all three collections
#[derive(Debug)]
pub struct ReferenceSet {
    pub clients: Result<Vec<ReferenceOption>>,
    pub teams: Result<Vec<ReferenceOption>>,
    pub users: Result<Vec<ReferenceOption>>,
}

impl ReferenceSet {
    /// Iterate results together with the selector they feed
    pub fn into_results(
        self,
    ) -> impl Iterator<Item = (ReferenceKind, Result<Vec<ReferenceOption>>)> {
        [
            (ReferenceKind::Clients, self.clients),
            (ReferenceKind::Teams, self.teams),
            (ReferenceKind::Users, self.users),
        ]
        .into_iter()
    }
}

pub struct ReferenceLoader {
    api: Arc<dyn ProjectApi>,
    notifier: Arc<Notifier>,
}

impl ReferenceLoader {
    pub fn new(api: Arc<dyn ProjectApi>, notifier: Arc<Notifier>) -> Self {
        Self { api, notifier }
    }

    pub async fn load_clients(&self) -> Result<Vec<ReferenceOption>> {
        let loaded = self
            .api
            .list_clients()
            .await
            .map(|clients| clients.iter().map(ReferenceOption::from).collect());
        self.report(ReferenceKind::Clients, loaded).await
    }

    pub async fn load_teams(&self) -> Result<Vec<ReferenceOption>> {
        let loaded = self
            .api
            .list_teams()
            .await
            .map(|teams| teams.iter().map(ReferenceOption::from).collect());
        self.report(ReferenceKind::Teams, loaded).await
    }

    pub async fn load_users(&self) -> Result<Vec<ReferenceOption>> {
        let loaded = self
            .api
            .list_users()
            .await
            .map(|users| users.iter().map(ReferenceOption::from).collect());
        self.report(ReferenceKind::Users, loaded).await
    }

    /// Load clients, teams and users concurrently
    pub async fn load_all(&self) -> ReferenceSet {
        let (clients, teams, users) =
            futures::join!(self.load_clients(), self.load_teams(), self.load_users());
        ReferenceSet {
            clients,
            teams,
            users,
        }
    }

    async fn report(
        &self,
        kind: ReferenceKind,
        loaded: Result<Vec<ReferenceOption>>,
    ) -> Result<Vec<ReferenceOption>> {
        match &loaded {
            Ok(options) => debug!("Loaded {} {:?}", options.len(), kind),
            Err(e) => {
                warn!("Failed to load {:?}: {}", kind, e);
                self.notifier.show(kind.load_error()).await;
            }
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{quiet_notifier, FakeApi};
    use crate::Error;

    #[tokio::test]
    async fn test_load_all_success() {
        let api = Arc::new(FakeApi::seeded());
        let loader = ReferenceLoader::new(api, quiet_notifier());

        let set = loader.load_all().await;
        assert_eq!(set.clients.unwrap().len(), 2);
        assert_eq!(set.teams.unwrap()[0].label, "Frontend");
        assert_eq!(set.users.unwrap()[1].label, "lbianchi");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_the_others() {
        let api = Arc::new(FakeApi::seeded());
        api.fail_next("list_teams", Error::http(500, "boom"));
        let notifier = quiet_notifier();
        let loader = ReferenceLoader::new(api, notifier.clone());

        let set = loader.load_all().await;

        assert!(set.clients.is_ok());
        assert!(set.teams.is_err());
        assert!(set.users.is_ok());
        assert_eq!(
            notifier.current().await.as_deref(),
            Some("Error loading teams.")
        );
    }
}
