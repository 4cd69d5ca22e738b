//! Task store
//!
//! Owns the in-memory task collection and the currently focused task. Each
//! remote operation synchronizes local state with the server result: the
//! list is replaced wholesale on fetch, and single elements are appended,
//! replaced in place or removed on create/update/delete. Operations race
//! freely; the last response to land wins.

use std::sync::{Arc, RwLock};

use crate::api::TaskApi;
use crate::error::ApiError;
use crate::models::{ApiResponse, CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};

const FETCH_TASKS_FALLBACK: &str = "Failed to fetch tasks";
const FETCH_TASK_FALLBACK: &str = "Failed to fetch task";
const CREATE_TASK_FALLBACK: &str = "Failed to create task";
const UPDATE_TASK_FALLBACK: &str = "Failed to update task";
const DELETE_TASK_FALLBACK: &str = "Failed to delete task";
const UPDATE_STATUS_FALLBACK: &str = "Failed to update task status";

/// Read-only snapshot of the task collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskState {
    /// Server-ordered task list (never re-sorted locally)
    pub tasks: Vec<Task>,
    /// Independently fetched task for detail views
    pub current_task: Option<Task>,
    /// A blocking operation is in flight
    pub loading: bool,
    /// Human-readable failure from the last operation
    pub error: Option<String>,
}

/// State transitions of the task collection
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    /// A blocking operation started
    Loading,
    /// List fetch succeeded; replace the collection wholesale
    ListLoaded(Vec<Task>),
    /// Single fetch succeeded; set the focused task
    CurrentLoaded(Task),
    /// An operation failed with a displayable message
    Failed(String),
    /// Create succeeded; append the returned task
    Created(Task),
    /// Update succeeded; replace by id and refocus.
    /// `background` updates (inline status changes) leave `loading` alone so
    /// no spinner ever flashes for them.
    Updated { task: Task, background: bool },
    /// Delete succeeded; remove by id, dropping the focused task if it matches
    Deleted(String),
    /// Drop the recorded error
    ClearError,
    /// Drop the focused task
    ClearCurrentTask,
}

impl TaskState {
    /// Pure transition function; the only way task state changes
    #[must_use]
    pub fn apply(self, action: TaskAction) -> Self {
        match action {
            TaskAction::Loading => Self {
                loading: true,
                error: None,
                ..self
            },
            TaskAction::ListLoaded(tasks) => Self {
                tasks,
                loading: false,
                ..self
            },
            TaskAction::CurrentLoaded(task) => Self {
                current_task: Some(task),
                loading: false,
                ..self
            },
            TaskAction::Failed(message) => Self {
                loading: false,
                error: Some(message),
                ..self
            },
            TaskAction::Created(task) => {
                let mut tasks = self.tasks;
                tasks.push(task);
                Self {
                    tasks,
                    loading: false,
                    current_task: self.current_task,
                    error: self.error,
                }
            }
            TaskAction::Updated { task, background } => {
                let loading = if background { self.loading } else { false };
                let tasks = self
                    .tasks
                    .into_iter()
                    .map(|t| if t.id == task.id { task.clone() } else { t })
                    .collect();
                Self {
                    tasks,
                    current_task: Some(task),
                    loading,
                    error: self.error,
                }
            }
            TaskAction::Deleted(id) => {
                let tasks = self.tasks.into_iter().filter(|t| t.id != id).collect();
                let current_task = self.current_task.filter(|t| t.id != id);
                Self {
                    tasks,
                    current_task,
                    loading: false,
                    error: self.error,
                }
            }
            TaskAction::ClearError => Self { error: None, ..self },
            TaskAction::ClearCurrentTask => Self {
                current_task: None,
                ..self
            },
        }
    }
}

/// Single-writer store for the task collection
pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    state: RwLock<TaskState>,
}

impl TaskStore {
    /// Create an empty store; the collection is always refetched
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            state: RwLock::new(TaskState::default()),
        }
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state.read().unwrap().clone()
    }

    fn dispatch(&self, action: TaskAction) {
        let mut guard = self.state.write().unwrap();
        *guard = std::mem::take(&mut *guard).apply(action);
    }

    /// Fetch the full task list
    pub async fn fetch_tasks(&self) {
        self.dispatch(TaskAction::Loading);
        match self.api.list_tasks().await {
            Ok(ApiResponse {
                success: true,
                data: Some(tasks),
                ..
            }) => self.dispatch(TaskAction::ListLoaded(tasks)),
            other => self.fail(other, FETCH_TASKS_FALLBACK),
        }
    }

    /// Fetch a single task for the detail view; does not touch the list
    pub async fn fetch_task(&self, id: &str) {
        if id.trim().is_empty() {
            self.dispatch(TaskAction::Failed(FETCH_TASK_FALLBACK.to_string()));
            return;
        }
        self.dispatch(TaskAction::Loading);
        match self.api.get_task(id).await {
            Ok(ApiResponse {
                success: true,
                data: Some(task),
                ..
            }) => self.dispatch(TaskAction::CurrentLoaded(task)),
            other => self.fail(other, FETCH_TASK_FALLBACK),
        }
    }

    /// Create a task and append the server's version to the list
    pub async fn create_task(&self, request: &CreateTaskRequest) {
        self.dispatch(TaskAction::Loading);
        match self.api.create_task(request).await {
            Ok(ApiResponse {
                success: true,
                data: Some(task),
                ..
            }) => self.dispatch(TaskAction::Created(task)),
            other => self.fail(other, CREATE_TASK_FALLBACK),
        }
    }

    /// Patch a task; the returned task replaces the list element and becomes
    /// the focused task (supports the detail-view edit flow)
    pub async fn update_task(&self, id: &str, request: &UpdateTaskRequest) {
        self.dispatch(TaskAction::Loading);
        match self.api.update_task(id, request).await {
            Ok(ApiResponse {
                success: true,
                data: Some(task),
                ..
            }) => self.dispatch(TaskAction::Updated {
                task,
                background: false,
            }),
            other => self.fail(other, UPDATE_TASK_FALLBACK),
        }
    }

    /// Delete a task, removing it from the list and the detail view
    pub async fn delete_task(&self, id: &str) {
        if id.trim().is_empty() {
            self.dispatch(TaskAction::Failed(DELETE_TASK_FALLBACK.to_string()));
            return;
        }
        self.dispatch(TaskAction::Loading);
        match self.api.delete_task(id).await {
            Ok(ApiResponse { success: true, .. }) => {
                self.dispatch(TaskAction::Deleted(id.to_string()));
            }
            other => self.fail(other, DELETE_TASK_FALLBACK),
        }
    }

    /// Change a task's status inline, without the loading flag
    ///
    /// Designed for non-blocking status toggles in list rows; the merge is
    /// the same as [`update_task`](Self::update_task) but no spinner flashes.
    pub async fn update_task_status(&self, id: &str, status: TaskStatus) {
        match self.api.update_task_status(id, status).await {
            Ok(ApiResponse {
                success: true,
                data: Some(task),
                ..
            }) => self.dispatch(TaskAction::Updated {
                task,
                background: true,
            }),
            other => self.fail(other, UPDATE_STATUS_FALLBACK),
        }
    }

    /// Drop the recorded error
    pub fn clear_error(&self) {
        self.dispatch(TaskAction::ClearError);
    }

    /// Drop the focused task
    pub fn clear_current_task(&self) {
        self.dispatch(TaskAction::ClearCurrentTask);
    }

    /// Map a failed outcome to a displayable message, in fixed precedence:
    /// server-supplied envelope error, then transport text, then the
    /// operation fallback.
    fn fail<T>(&self, outcome: Result<ApiResponse<T>, ApiError>, fallback: &str) {
        let message = match outcome {
            Ok(envelope) => envelope.error.unwrap_or_else(|| fallback.to_string()),
            Err(err) => {
                tracing::warn!("Task request failed: {err}");
                err.user_message().unwrap_or_else(|| fallback.to_string())
            }
        };
        self.dispatch(TaskAction::Failed(message));
    }
}
