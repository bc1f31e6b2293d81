use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use scheda_core::api::ProjectApi;
use scheda_core::auth::{Credentials, LoginResponse, SessionUser};
use scheda_core::ids::{ProjectId, TaskId};
use scheda_core::navigation::{navigate_after, Navigator, Route};
use scheda_core::notifier::Notifier;
use scheda_core::project::{Project, ProjectDraft, ProjectFilter, ProjectPatch};
use scheda_core::reference::{Client as ClientRecord, Team, User};
use scheda_core::task::{Task, TaskDraft, TaskPatch};
use scheda_core::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Delay before navigating to the login page after a 401/403
    pub redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }
}

/// JSON client for the project/task API.
///
/// Every failure is logged and shown on the notifier before it is returned,
/// so callers only add their own message when they have something to add.
pub struct ApiClient {
    client: Client,
    base_url: String,
    notifier: Arc<Notifier>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        notifier: Arc<Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            notifier,
            navigator,
            redirect_delay: config.redirect_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a JSON request and decode the JSON answer.
    ///
    /// Returns `None` for 204 and for empty 2xx bodies.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>> {
        let response = self.send(method.clone(), path, body).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("{} {} answered {}, session required", method, path, status);
            self.notifier.show(Error::AuthRequired.user_message()).await;
            navigate_after(
                Arc::clone(&self.navigator),
                Route::Login,
                self.redirect_delay,
            );
            return Err(Error::AuthRequired);
        }

        if !status.is_success() {
            let err = error_from_response(response).await;
            return Err(self.fail(&method, path, err).await);
        }

        if status == StatusCode::NO_CONTENT {
            debug!("{} {} -> 204", method, path);
            return Ok(None);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = Error::Network(e.to_string());
                return Err(self.fail(&method, path, err).await);
            }
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&text) {
            Ok(value) => {
                debug!("{} {} -> {}", method, path, status);
                Ok(Some(value))
            }
            Err(e) => Err(self.fail(&method, path, Error::Serialization(e)).await),
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                let err = Error::Network(e.to_string());
                Err(self.fail(&method, path, err).await)
            }
        }
    }

    /// Log and show a failure, then hand it back
    async fn fail(&self, method: &Method, path: &str, err: Error) -> Error {
        error!("{} {} failed: {}", method, path, err);
        self.notifier.show(err.user_message()).await;
        err
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.call::<()>(Method::GET, path, None).await?;
        self.decode(&Method::GET, path, value).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        value: Option<Value>,
    ) -> Result<T> {
        match serde_json::from_value(value.unwrap_or(Value::Null)) {
            Ok(decoded) => Ok(decoded),
            Err(e) => Err(self.fail(method, path, Error::Serialization(e)).await),
        }
    }

    /// Decode an optional body; 204 yields `None`
    async fn decode_opt<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        value: Option<Value>,
    ) -> Result<Option<T>> {
        match value {
            None => Ok(None),
            Some(value) => self.decode(method, path, Some(value)).await.map(Some),
        }
    }

    /// Start a session. Bad credentials come back as `Error::Http` with the
    /// server's message and never trigger the login redirect.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser> {
        let response = self.send(Method::POST, "/login", Some(credentials)).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| message_field(&body))
                .unwrap_or_else(|| "Login failed. Try again.".to_string());
            let err = Error::http(status.as_u16(), message);
            return Err(self.fail(&Method::POST, "/login", err).await);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = Error::Network(e.to_string());
                return Err(self.fail(&Method::POST, "/login", err).await);
            }
        };
        let body: LoginResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) => {
                return Err(self
                    .fail(&Method::POST, "/login", Error::Serialization(e))
                    .await)
            }
        };
        info!("Logged in as {}", body.user.username);
        Ok(body.user)
    }

    /// End the session
    pub async fn logout(&self) -> Result<()> {
        let response = self.send::<()>(Method::GET, "/logout", None).await?;
        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            let err = error_from_response(response).await;
            return Err(self.fail(&Method::GET, "/logout", err).await);
        }
        info!("Logged out");
        Ok(())
    }
}

/// The `message` (or `error`) field of a JSON error body
fn message_field(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let fallback = format!(
        "HTTP error {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown status")
    );
    let message = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .and_then(|body| message_field(&body))
        .unwrap_or(fallback);
    Error::http(status.as_u16(), message)
}

fn projects_path(filter: &ProjectFilter) -> String {
    let query: Vec<String> = filter
        .pairs()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
        .collect();
    if query.is_empty() {
        "/api/projects".to_string()
    } else {
        format!("/api/projects?{}", query.join("&"))
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        self.fetch(&projects_path(filter)).await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Project> {
        self.fetch(&format!("/api/projects/{}", id)).await
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let path = "/api/projects";
        let value = self.call(Method::POST, path, Some(draft)).await?;
        self.decode(&Method::POST, path, value).await
    }

    async fn update_project(
        &self,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>> {
        let path = format!("/api/projects/{}", id);
        let value = self.call(Method::PUT, &path, Some(patch)).await?;
        self.decode_opt(&Method::PUT, &path, value).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        self.call::<()>(Method::DELETE, &format!("/api/projects/{}", id), None)
            .await?;
        Ok(())
    }

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        self.fetch(&format!("/api/projects/{}/tasks", project_id))
            .await
    }

    async fn create_task(&self, project_id: ProjectId, draft: &TaskDraft) -> Result<Task> {
        let path = format!("/api/projects/{}/tasks", project_id);
        let value = self.call(Method::POST, &path, Some(draft)).await?;
        self.decode(&Method::POST, &path, value).await
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>> {
        let path = format!("/api/tasks/{}", id);
        let value = self.call(Method::PUT, &path, Some(patch)).await?;
        self.decode_opt(&Method::PUT, &path, value).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.call::<()>(Method::DELETE, &format!("/api/tasks/{}", id), None)
            .await?;
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        self.fetch("/api/clients").await
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        self.fetch("/api/teams").await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch("/api/users").await
    }
}
