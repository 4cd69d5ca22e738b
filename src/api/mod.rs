//! Remote API surface
//!
//! The stores talk to the server through the [`AuthApi`] and [`TaskApi`]
//! traits; [`HttpClient`] is the shipped implementation, tests substitute
//! in-memory fakes.
//!
//! Every method returns `ApiResult<ApiResponse<T>>`: the outer `Result` is
//! transport success/failure, the inner envelope is the server's logical
//! verdict. Keeping the two layers apart is what lets the stores apply their
//! error-message precedence exactly.

pub mod http;

pub use http::HttpClient;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    ApiResponse, AuthResponse, CreateTaskRequest, LoginRequest, RegisterRequest, Task, TaskStatus,
    UpdateTaskRequest,
};

/// Authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> ApiResult<ApiResponse<AuthResponse>>;

    /// `POST /register`
    async fn register(&self, request: &RegisterRequest) -> ApiResult<ApiResponse<AuthResponse>>;

    /// `POST /logout`
    async fn logout(&self) -> ApiResult<ApiResponse<serde_json::Value>>;

    /// `POST /refresh`
    async fn refresh(&self) -> ApiResult<ApiResponse<AuthResponse>>;

    /// `GET /health`
    async fn health(&self) -> ApiResult<ApiResponse<serde_json::Value>>;
}

/// Task collection endpoints
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /tasks`
    async fn list_tasks(&self) -> ApiResult<ApiResponse<Vec<Task>>>;

    /// `GET /tasks/{id}`
    async fn get_task(&self, id: &str) -> ApiResult<ApiResponse<Task>>;

    /// `POST /tasks`
    async fn create_task(&self, request: &CreateTaskRequest) -> ApiResult<ApiResponse<Task>>;

    /// `PUT /tasks/{id}`
    async fn update_task(
        &self,
        id: &str,
        request: &UpdateTaskRequest,
    ) -> ApiResult<ApiResponse<Task>>;

    /// `DELETE /tasks/{id}`
    async fn delete_task(&self, id: &str) -> ApiResult<ApiResponse<serde_json::Value>>;

    /// `PATCH /tasks/{id}/status`
    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
    ) -> ApiResult<ApiResponse<Task>>;
}
