//! Data model shared with the remote task-management API
//!
//! Wire shapes mirror the server contract exactly; everything here is plain
//! serde data with no behavior beyond small conveniences.

pub mod response;
pub mod task;
pub mod user;

pub use response::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest};
pub use task::{CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};
pub use user::{Role, User};
