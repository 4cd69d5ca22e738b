//! HTTP implementation of the remote API
//!
//! Thin reqwest wrapper shared by both stores. Cross-cutting behavior lives
//! here rather than in the stores:
//! - injects `Authorization: Bearer <token>` from the persisted session on
//!   every request (read fresh per request, so a purge is honored mid-flight);
//! - on HTTP 401 purges the persisted session and latches a session-expired
//!   flag the embedding application polls to redirect to login;
//! - decodes structured error bodies so the server's own message survives
//!   even on non-2xx statuses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{AuthApi, TaskApi};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, AuthResponse, CreateTaskRequest, LoginRequest, RegisterRequest, Task, TaskStatus,
    UpdateTaskRequest,
};
use crate::storage::SessionStorage;

/// Remote client for the task-management API
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    storage: SessionStorage,
    session_expired: Arc<AtomicBool>,
}

impl HttpClient {
    /// Create a client from configuration and the shared session storage
    pub fn new(config: &ApiConfig, storage: SessionStorage) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            storage,
            session_expired: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether a request has been rejected with 401 since the last reset
    ///
    /// Presentation polls this to force navigation back to the login entry
    /// point; the persisted session has already been purged by then.
    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.session_expired.load(Ordering::SeqCst)
    }

    /// Reset the session-expired latch (after redirecting to login)
    pub fn reset_session_expired(&self) {
        self.session_expired.store(false, Ordering::SeqCst);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(token) = self.storage.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("{} {}", method, path);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                ApiError::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.map_err(ApiError::Http)?;
        tracing::debug!("{} {} -> {}", method, path, status);

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        } else if let Ok(envelope) = serde_json::from_str::<ApiResponse<T>>(&text) {
            // Validation-shaped rejection: the server's message travels in
            // the envelope even on 4xx/5xx.
            Ok(envelope)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            })
        }
    }

    fn handle_unauthorized(&self) {
        tracing::warn!("Received 401, clearing persisted session");
        if let Err(err) = self.storage.purge() {
            tracing::warn!("Failed to clear persisted session: {err}");
        }
        self.session_expired.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<ApiResponse<AuthResponse>> {
        self.send(Method::POST, "/login", Some(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<ApiResponse<AuthResponse>> {
        self.send(Method::POST, "/register", Some(request)).await
    }

    async fn logout(&self) -> ApiResult<ApiResponse<serde_json::Value>> {
        self.send::<_, ()>(Method::POST, "/logout", None).await
    }

    async fn refresh(&self) -> ApiResult<ApiResponse<AuthResponse>> {
        self.send::<_, ()>(Method::POST, "/refresh", None).await
    }

    async fn health(&self) -> ApiResult<ApiResponse<serde_json::Value>> {
        self.send::<_, ()>(Method::GET, "/health", None).await
    }
}

#[async_trait]
impl TaskApi for HttpClient {
    async fn list_tasks(&self) -> ApiResult<ApiResponse<Vec<Task>>> {
        self.send::<_, ()>(Method::GET, "/tasks", None).await
    }

    async fn get_task(&self, id: &str) -> ApiResult<ApiResponse<Task>> {
        self.send::<_, ()>(Method::GET, &format!("/tasks/{id}"), None)
            .await
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> ApiResult<ApiResponse<Task>> {
        self.send(Method::POST, "/tasks", Some(request)).await
    }

    async fn update_task(
        &self,
        id: &str,
        request: &UpdateTaskRequest,
    ) -> ApiResult<ApiResponse<Task>> {
        self.send(Method::PUT, &format!("/tasks/{id}"), Some(request))
            .await
    }

    async fn delete_task(&self, id: &str) -> ApiResult<ApiResponse<serde_json::Value>> {
        self.send::<_, ()>(Method::DELETE, &format!("/tasks/{id}"), None)
            .await
    }

    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> ApiResult<ApiResponse<Task>> {
        let body = serde_json::json!({ "status": status });
        self.send(Method::PATCH, &format!("/tasks/{id}/status"), Some(&body))
            .await
    }
}
