use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use scheda_client::{ApiClient, ClientConfig};
use scheda_core::api::ProjectApi;
use scheda_core::auth::Credentials;
use scheda_core::ids::{ProjectId, TaskId};
use scheda_core::navigation::{Navigator, Route};
use scheda_core::notifier::{NoticeSurface, Notifier};
use scheda_core::project::{ProjectDraft, ProjectFilter};
use scheda_core::status::Status;
use scheda_core::task::TaskPatch;
use scheda_core::Error;

type Bodies = Arc<Mutex<Vec<Value>>>;

struct NullSurface;

impl NoticeSurface for NullSurface {
    fn show(&self, _message: &str) {}
    fn hide(&self) {}
}

#[derive(Default)]
struct Routes(Mutex<Vec<Route>>);

impl Navigator for Routes {
    fn navigate(&self, route: Route) {
        self.0.lock().unwrap().push(route);
    }
}

struct Fixture {
    client: ApiClient,
    notifier: Arc<Notifier>,
    routes: Arc<Routes>,
    bodies: Bodies,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |cookie| cookie.contains("session=abc"))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        (
            [(header::SET_COOKIE, "session=abc; Path=/; HttpOnly")],
            Json(json!({
                "message": "Login successful",
                "user": {"id": 1, "username": body["username"], "role": "admin"}
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn list_projects(headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized"})),
        )
            .into_response();
    }
    Json(json!([
        {"id": 1, "name": "Sito Demo", "status": "In Corso", "deadline": null, "client_id": 2},
        {"id": 2, "name": "Shop", "status": "Completato", "deadline": "2024-05-01T00:00:00"}
    ]))
    .into_response()
}

async fn create_project(State(bodies): State<Bodies>, Json(body): Json<Value>) -> Response {
    bodies.lock().unwrap().push(body.clone());
    let mut project = body;
    project["id"] = json!(42);
    (StatusCode::CREATED, Json(project)).into_response()
}

async fn get_project(Path(id): Path<i64>) -> Response {
    if id == 1 {
        Json(json!({"id": 1, "name": "Sito Demo", "status": "Pending", "deadline": "not-a-date"}))
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Project not found"})),
        )
            .into_response()
    }
}

async fn update_task(Path(id): Path<i64>) -> Response {
    if id == 7 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Database error"})),
        )
            .into_response()
    }
}

async fn delete_task() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn teams() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response()
}

async fn clients() -> StatusCode {
    StatusCode::FORBIDDEN
}

async fn users() -> &'static str {
    "this is not json"
}

async fn spawn_server(bodies: Bodies) -> SocketAddr {
    let app = Router::new()
        .route("/login", post(login))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        .route("/api/teams", get(teams))
        .route("/api/clients", get(clients))
        .route("/api/users", get(users))
        .with_state(bodies);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(base_url: String) -> (ApiClient, Arc<Notifier>, Arc<Routes>) {
    let notifier = Arc::new(Notifier::new(Arc::new(NullSurface)));
    let routes = Arc::new(Routes::default());
    let config = ClientConfig::new(base_url).with_redirect_delay(Duration::from_millis(10));
    let client = ApiClient::new(config, notifier.clone(), routes.clone()).unwrap();
    (client, notifier, routes)
}

async fn fixture() -> Fixture {
    let bodies = Bodies::default();
    let addr = spawn_server(bodies.clone()).await;
    let (client, notifier, routes) = client_for(format!("http://{}", addr));
    Fixture {
        client,
        notifier,
        routes,
        bodies,
    }
}

#[tokio::test]
async fn test_session_cookie_is_replayed() {
    let f = fixture().await;

    let unauthenticated = f.client.list_projects(&ProjectFilter::default()).await;
    assert!(matches!(unauthenticated, Err(Error::AuthRequired)));

    let user = f
        .client
        .login(&Credentials::new("mario", "secret").unwrap())
        .await
        .unwrap();
    assert_eq!(user.username, "mario");

    let projects = f
        .client
        .list_projects(&ProjectFilter::default())
        .await
        .unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].status, Status::InProgress);
    assert!(projects[0].deadline.is_none());
    assert!(projects[1].deadline.is_some());
}

#[tokio::test]
async fn test_auth_failure_notifies_and_redirects() {
    let f = fixture().await;

    let result = f.client.list_clients().await;

    assert!(matches!(result, Err(Error::AuthRequired)));
    assert_eq!(
        f.notifier.current().await.as_deref(),
        Some("Authentication required. You will be redirected to the login page.")
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*f.routes.0.lock().unwrap(), vec![Route::Login]);
}

#[tokio::test]
async fn test_bad_credentials_do_not_redirect() {
    let f = fixture().await;

    let result = f
        .client
        .login(&Credentials::new("mario", "wrong").unwrap())
        .await;

    match result {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(f.routes.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_json_error_message_is_surfaced() {
    let f = fixture().await;

    let result = f.client.get_project(ProjectId(9)).await;

    assert!(matches!(
        result,
        Err(Error::Http { status: 404, ref message }) if message == "Project not found"
    ));
    assert_eq!(
        f.notifier.current().await.as_deref(),
        Some("Project not found")
    );
}

#[tokio::test]
async fn test_error_field_is_used_when_message_is_missing() {
    let f = fixture().await;

    let result = f
        .client
        .update_task(TaskId(8), &TaskPatch::status(Status::Completed))
        .await;

    assert!(matches!(
        result,
        Err(Error::Http { status: 500, ref message }) if message == "Database error"
    ));
}

#[tokio::test]
async fn test_non_json_error_uses_status_line() {
    let f = fixture().await;

    let result = f.client.list_teams().await;

    assert!(matches!(
        result,
        Err(Error::Http { status: 500, ref message })
            if message == "HTTP error 500: Internal Server Error"
    ));
}

#[tokio::test]
async fn test_no_content_is_empty() {
    let f = fixture().await;

    let updated = f
        .client
        .update_task(TaskId(7), &TaskPatch::status(Status::Completed))
        .await
        .unwrap();
    assert!(updated.is_none());

    f.client.delete_task(TaskId(7)).await.unwrap();
}

#[tokio::test]
async fn test_undecodable_body_is_a_serialization_error() {
    let f = fixture().await;

    let result = f.client.list_users().await;

    assert!(matches!(result, Err(Error::Serialization(_))));
}

#[tokio::test]
async fn test_malformed_deadline_becomes_none() {
    let f = fixture().await;

    let project = f.client.get_project(ProjectId(1)).await.unwrap();

    assert_eq!(project.name, "Sito Demo");
    assert!(project.deadline.is_none());
}

#[tokio::test]
async fn test_create_sends_nulls_for_unset_references() {
    let f = fixture().await;

    let project = f
        .client
        .create_project(&ProjectDraft::new("Sito Demo"))
        .await
        .unwrap();

    assert_eq!(project.id, ProjectId(42));
    assert_eq!(
        f.bodies.lock().unwrap()[0],
        json!({
            "name": "Sito Demo",
            "client_id": null,
            "team_id": null,
            "status": "Pending"
        })
    );
}

#[tokio::test]
async fn test_connection_refused_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (client, notifier, routes) = client_for(format!("http://{}", addr));

    let result = client.list_teams().await;

    assert!(matches!(result, Err(Error::Network(_))));
    assert_eq!(
        notifier.current().await.as_deref(),
        Some("Could not communicate with the server.")
    );
    assert!(routes.0.lock().unwrap().is_empty());
}
