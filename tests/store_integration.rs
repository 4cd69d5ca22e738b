//! Store integration tests
//!
//! Drive `SessionStore` and `TaskStore` end to end against scripted in-memory
//! implementations of the API traits. Each fake response is armed before the
//! call; an operation hitting an unarmed endpoint panics, which doubles as
//! proof that an operation made no network call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use tasklink::api::{AuthApi, TaskApi};
use tasklink::error::{ApiError, ApiResult};
use tasklink::models::{
    ApiResponse, AuthResponse, CreateTaskRequest, LoginRequest, RegisterRequest, Role, Task,
    TaskPriority, TaskStatus, UpdateTaskRequest,
};
use tasklink::storage::{PersistedSession, SessionStorage};
use tasklink::stores::{SessionStore, TaskStore};
use tasklink::models::User;

type Scripted<T> = Mutex<Vec<ApiResult<ApiResponse<T>>>>;

fn arm<T>(slot: &Scripted<T>, response: ApiResult<ApiResponse<T>>) {
    slot.lock().unwrap().push(response);
}

fn take<T>(slot: &Scripted<T>, endpoint: &str) -> ApiResult<ApiResponse<T>> {
    let mut queue = slot.lock().unwrap();
    assert!(!queue.is_empty(), "unexpected call to {endpoint}");
    queue.remove(0)
}

fn transport_err() -> ApiError {
    ApiError::Decode("connection reset by peer".to_string())
}

#[derive(Default)]
struct FakeAuthApi {
    login: Scripted<AuthResponse>,
    register: Scripted<AuthResponse>,
    refresh: Scripted<AuthResponse>,
    logout: Scripted<serde_json::Value>,
    health: Scripted<serde_json::Value>,
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _request: &LoginRequest) -> ApiResult<ApiResponse<AuthResponse>> {
        take(&self.login, "POST /login")
    }

    async fn register(&self, _request: &RegisterRequest) -> ApiResult<ApiResponse<AuthResponse>> {
        take(&self.register, "POST /register")
    }

    async fn logout(&self) -> ApiResult<ApiResponse<serde_json::Value>> {
        take(&self.logout, "POST /logout")
    }

    async fn refresh(&self) -> ApiResult<ApiResponse<AuthResponse>> {
        take(&self.refresh, "POST /refresh")
    }

    async fn health(&self) -> ApiResult<ApiResponse<serde_json::Value>> {
        take(&self.health, "GET /health")
    }
}

#[derive(Default)]
struct FakeTaskApi {
    list: Scripted<Vec<Task>>,
    get: Scripted<Task>,
    create: Scripted<Task>,
    update: Scripted<Task>,
    delete: Scripted<serde_json::Value>,
    status: Scripted<Task>,
}

#[async_trait]
impl TaskApi for FakeTaskApi {
    async fn list_tasks(&self) -> ApiResult<ApiResponse<Vec<Task>>> {
        take(&self.list, "GET /tasks")
    }

    async fn get_task(&self, _id: &str) -> ApiResult<ApiResponse<Task>> {
        take(&self.get, "GET /tasks/{id}")
    }

    async fn create_task(&self, _request: &CreateTaskRequest) -> ApiResult<ApiResponse<Task>> {
        take(&self.create, "POST /tasks")
    }

    async fn update_task(
        &self,
        _id: &str,
        _request: &UpdateTaskRequest,
    ) -> ApiResult<ApiResponse<Task>> {
        take(&self.update, "PUT /tasks/{id}")
    }

    async fn delete_task(&self, _id: &str) -> ApiResult<ApiResponse<serde_json::Value>> {
        take(&self.delete, "DELETE /tasks/{id}")
    }

    async fn update_task_status(
        &self,
        _id: &str,
        _status: TaskStatus,
    ) -> ApiResult<ApiResponse<Task>> {
        take(&self.status, "PATCH /tasks/{id}/status")
    }
}

fn auth_payload() -> AuthResponse {
    AuthResponse {
        token: "T1".to_string(),
        user_id: "U1".to_string(),
        email: "a@b.com".to_string(),
        role: Role::User,
    }
}

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_date: None,
        created_by: "U1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn session_store(dir: &TempDir) -> (Arc<FakeAuthApi>, SessionStore) {
    let api = Arc::new(FakeAuthApi::default());
    let storage = SessionStorage::with_dir(dir.path());
    let store = SessionStore::new(api.clone(), storage);
    (api, store)
}

fn task_store() -> (Arc<FakeTaskApi>, TaskStore) {
    let api = Arc::new(FakeTaskApi::default());
    let store = TaskStore::new(api.clone());
    (api, store)
}

#[tokio::test]
async fn login_success_populates_state_and_storage() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::ok(auth_payload())));

    store.login("a@b.com", "secret1").await;

    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("T1"));
    assert_eq!(
        state.user,
        Some(User {
            id: "U1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::User,
        })
    );
    assert!(state.error.is_none());
    assert!(!state.loading);

    // Durable storage holds the same token
    let storage = SessionStorage::with_dir(dir.path());
    assert_eq!(storage.token(), Some("T1".to_string()));
}

#[tokio::test]
async fn login_server_rejection_surfaces_verbatim() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::err("Invalid credentials")));

    store.login("a@b.com", "wrong").await;

    let state = store.state();
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert_eq!(SessionStorage::with_dir(dir.path()).token(), None);
}

#[tokio::test]
async fn login_transport_failure_uses_fallback() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Err(transport_err()));

    store.login("a@b.com", "secret1").await;

    let state = store.state();
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Login failed"));
}

#[tokio::test]
async fn register_creates_immediate_session() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.register, Ok(ApiResponse::ok(auth_payload())));

    store.register("a@b.com", "secret1").await;

    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(
        state.is_authenticated,
        state.user.is_some() && state.token.is_some()
    );
    assert_eq!(SessionStorage::with_dir(dir.path()).token(), Some("T1".to_string()));
}

#[tokio::test]
async fn logout_is_unconditional_even_when_remote_fails() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::ok(auth_payload())));
    store.login("a@b.com", "secret1").await;

    arm(&api.logout, Err(transport_err()));
    store.logout().await;

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    assert!(state.token.is_none());
    assert!(state.error.is_none());
    assert_eq!(SessionStorage::with_dir(dir.path()).token(), None);
}

#[tokio::test]
async fn hydration_restores_session_without_network() {
    let dir = TempDir::new().unwrap();
    let storage = SessionStorage::with_dir(dir.path());
    storage
        .save(&PersistedSession {
            token: "T1".to_string(),
            user: User {
                id: "U1".to_string(),
                email: "a@b.com".to_string(),
                role: Role::Admin,
            },
        })
        .unwrap();

    // The fake panics on any call, so a passing test proves no request fired
    let (_api, store) = session_store(&dir);

    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("T1"));
    assert_eq!(state.user.unwrap().role, Role::Admin);
}

#[tokio::test]
async fn corrupted_persisted_session_starts_anonymous() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("session.json"), "{ not json").unwrap();

    let (_api, store) = session_store(&dir);

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    // The corrupted entry was purged
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn refresh_success_renews_token_and_persistence() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::ok(auth_payload())));
    store.login("a@b.com", "secret1").await;

    let renewed = AuthResponse {
        token: "T2".to_string(),
        ..auth_payload()
    };
    arm(&api.refresh, Ok(ApiResponse::ok(renewed)));
    store.refresh().await;

    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.token.as_deref(), Some("T2"));
    assert!(state.error.is_none());
    // The renewed token replaced the persisted one
    assert_eq!(
        SessionStorage::with_dir(dir.path()).token(),
        Some("T2".to_string())
    );
}

#[tokio::test]
async fn refresh_failure_follows_login_error_contract() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::ok(auth_payload())));
    store.login("a@b.com", "secret1").await;

    arm(&api.refresh, Err(transport_err()));
    store.refresh().await;

    let state = store.state();
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Failed to refresh session"));
    // Prior identity fields are not forcibly cleared
    assert_eq!(state.token.as_deref(), Some("T1"));
}

#[tokio::test]
async fn refresh_server_rejection_surfaces_verbatim() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.refresh, Ok(ApiResponse::err("token revoked")));
    store.refresh().await;

    assert_eq!(store.state().error.as_deref(), Some("token revoked"));
}

#[tokio::test]
async fn login_persist_failure_ends_unauthenticated() {
    // Root the storage under a plain file so every write fails
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let api = Arc::new(FakeAuthApi::default());
    let storage = SessionStorage::with_dir(blocker.join("nested"));
    let store = SessionStore::new(api.clone(), storage);

    arm(&api.login, Ok(ApiResponse::ok(auth_payload())));
    store.login("a@b.com", "secret1").await;

    let state = store.state();
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Login failed"));
    assert!(!state.loading);
    // Memory never holds a token that storage does not
    assert_eq!(SessionStorage::with_dir(blocker.join("nested")).token(), None);
}

#[tokio::test]
async fn health_check_reports_verdict_without_touching_state() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);

    arm(
        &api.health,
        Ok(ApiResponse::ok(serde_json::json!({"status": "ok"}))),
    );
    assert!(store.health_check().await);

    arm(&api.health, Ok(ApiResponse::err("degraded")));
    assert!(!store.health_check().await);

    arm(&api.health, Err(transport_err()));
    assert!(!store.health_check().await);

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(state.error.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn clear_error_only_clears_error() {
    let dir = TempDir::new().unwrap();
    let (api, store) = session_store(&dir);
    arm(&api.login, Ok(ApiResponse::err("Invalid credentials")));
    store.login("a@b.com", "wrong").await;

    store.clear_error();
    assert!(store.state().error.is_none());
}

#[tokio::test]
async fn fetch_tasks_replaces_list_wholesale() {
    let (api, store) = task_store();
    arm(
        &api.list,
        Ok(ApiResponse::ok(vec![task("X1", "one"), task("X2", "two")])),
    );
    store.fetch_tasks().await;
    assert_eq!(store.state().tasks.len(), 2);

    arm(&api.list, Ok(ApiResponse::ok(vec![task("X3", "three")])));
    store.fetch_tasks().await;

    let state = store.state();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, "X3");
    assert!(!state.loading);
}

#[tokio::test]
async fn fetch_tasks_transport_failure_uses_fallback_and_keeps_list() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::ok(vec![task("X1", "one")])));
    store.fetch_tasks().await;

    arm(&api.list, Err(transport_err()));
    store.fetch_tasks().await;

    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("Failed to fetch tasks"));
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, "X1");
}

#[tokio::test]
async fn fetch_tasks_server_error_wins_over_fallback() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::err("database unavailable")));
    store.fetch_tasks().await;

    assert_eq!(store.state().error.as_deref(), Some("database unavailable"));
}

#[tokio::test]
async fn fetch_task_sets_current_without_touching_list() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::ok(vec![task("X1", "one")])));
    store.fetch_tasks().await;

    arm(&api.get, Ok(ApiResponse::ok(task("X9", "detail"))));
    store.fetch_task("X9").await;

    let state = store.state();
    assert_eq!(state.current_task.as_ref().unwrap().id, "X9");
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, "X1");
}

#[tokio::test]
async fn create_task_appends_exactly_one() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::ok(vec![task("X1", "one")])));
    store.fetch_tasks().await;

    let created = task("X2", "Buy milk");
    arm(&api.create, Ok(ApiResponse::ok(created.clone())));
    store
        .create_task(&CreateTaskRequest::new("Buy milk", ""))
        .await;

    let state = store.state();
    assert_eq!(state.tasks.len(), 2);
    assert_eq!(state.tasks[1], created);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn update_task_replaces_in_place_and_sets_current() {
    let (api, store) = task_store();
    arm(
        &api.list,
        Ok(ApiResponse::ok(vec![task("X1", "one"), task("X2", "two")])),
    );
    store.fetch_tasks().await;

    let mut edited = task("X1", "renamed");
    edited.priority = TaskPriority::Urgent;
    arm(&api.update, Ok(ApiResponse::ok(edited.clone())));
    store
        .update_task(
            "X1",
            &UpdateTaskRequest {
                title: Some("renamed".to_string()),
                priority: Some(TaskPriority::Urgent),
                ..UpdateTaskRequest::default()
            },
        )
        .await;

    let state = store.state();
    assert_eq!(state.tasks.len(), 2);
    assert_eq!(state.tasks[0], edited);
    assert_eq!(state.tasks[1].id, "X2");
    assert_eq!(state.current_task, Some(edited));
    assert!(!state.loading);
}

#[tokio::test]
async fn delete_task_clears_matching_current_task() {
    let (api, store) = task_store();
    arm(
        &api.list,
        Ok(ApiResponse::ok(vec![task("X1", "one"), task("X2", "two")])),
    );
    store.fetch_tasks().await;
    arm(&api.get, Ok(ApiResponse::ok(task("X1", "one"))));
    store.fetch_task("X1").await;

    arm(&api.delete, Ok(ApiResponse::ok(serde_json::json!({}))));
    store.delete_task("X1").await;

    let state = store.state();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].id, "X2");
    assert!(state.current_task.is_none());
}

#[tokio::test]
async fn delete_task_keeps_unrelated_current_task() {
    let (api, store) = task_store();
    arm(
        &api.list,
        Ok(ApiResponse::ok(vec![task("X1", "one"), task("X2", "two")])),
    );
    store.fetch_tasks().await;
    arm(&api.get, Ok(ApiResponse::ok(task("X2", "two"))));
    store.fetch_task("X2").await;

    arm(&api.delete, Ok(ApiResponse::ok(serde_json::json!({}))));
    store.delete_task("X1").await;

    assert_eq!(store.state().current_task.unwrap().id, "X2");
}

#[tokio::test]
async fn delete_failure_leaves_collection_unchanged() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::ok(vec![task("X1", "one")])));
    store.fetch_tasks().await;

    arm(&api.delete, Ok(ApiResponse::err("task not found")));
    store.delete_task("X1").await;

    let state = store.state();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.error.as_deref(), Some("task not found"));
}

#[tokio::test]
async fn update_task_status_merges_without_loading() {
    let (api, store) = task_store();
    arm(&api.list, Ok(ApiResponse::ok(vec![task("X1", "one")])));
    store.fetch_tasks().await;

    let mut done = task("X1", "one");
    done.status = TaskStatus::Completed;
    arm(&api.status, Ok(ApiResponse::ok(done.clone())));
    store.update_task_status("X1", TaskStatus::Completed).await;

    let state = store.state();
    assert_eq!(state.tasks[0].status, TaskStatus::Completed);
    assert_eq!(state.current_task, Some(done));
    assert!(!state.loading);
}

#[tokio::test]
async fn update_task_status_failure_uses_fallback() {
    let (api, store) = task_store();
    arm(&api.status, Err(transport_err()));
    store.update_task_status("X1", TaskStatus::Cancelled).await;

    assert_eq!(
        store.state().error.as_deref(),
        Some("Failed to update task status")
    );
}

#[tokio::test]
async fn no_duplicate_ids_across_operation_sequence() {
    let (api, store) = task_store();
    arm(
        &api.list,
        Ok(ApiResponse::ok(vec![task("X1", "one"), task("X2", "two")])),
    );
    store.fetch_tasks().await;

    arm(&api.create, Ok(ApiResponse::ok(task("X3", "three"))));
    store.create_task(&CreateTaskRequest::new("three", "")).await;

    arm(&api.update, Ok(ApiResponse::ok(task("X2", "renamed"))));
    store
        .update_task("X2", &UpdateTaskRequest::default())
        .await;

    arm(&api.delete, Ok(ApiResponse::ok(serde_json::json!({}))));
    store.delete_task("X1").await;

    let state = store.state();
    let mut ids: Vec<_> = state.tasks.iter().map(|t| t.id.clone()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn clear_current_task_is_side_effect_free() {
    let (api, store) = task_store();
    arm(&api.get, Ok(ApiResponse::ok(task("X1", "one"))));
    store.fetch_task("X1").await;

    store.clear_current_task();

    let state = store.state();
    assert!(state.current_task.is_none());
    assert!(state.error.is_none());
}
