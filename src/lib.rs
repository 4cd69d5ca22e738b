//! tasklink Library
//!
//! Client-side state synchronization for a task-management API:
//! - Session management (login, register, logout, persistence across restarts)
//! - Task collection management (fetch, create, update, delete, status changes)
//! - A reqwest-based remote client with bearer injection and 401 handling
//!
//! Presentation code constructs the stores once, triggers their async
//! operations, and renders the state snapshots they expose; failures never
//! escape a store, they become part of its state.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklink::api::HttpClient;
//! use tasklink::config::AppConfig;
//! use tasklink::storage::SessionStorage;
//! use tasklink::stores::{SessionStore, TaskStore};
//!
//! # async fn run() -> tasklink::error::Result<()> {
//! let config = AppConfig::load()?;
//! let storage = SessionStorage::new();
//! let client = Arc::new(HttpClient::new(&config.api, storage.clone())?);
//!
//! let session = SessionStore::new(client.clone(), storage);
//! let tasks = TaskStore::new(client);
//!
//! session.login("a@b.com", "secret1").await;
//! if session.state().is_authenticated {
//!     tasks.fetch_tasks().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod stores;

pub use api::{AuthApi, HttpClient, TaskApi};
pub use config::AppConfig;
pub use error::{ApiError, Result, TasklinkError};
pub use models::{Task, TaskPriority, TaskStatus, User};
pub use storage::SessionStorage;
pub use stores::{SessionStore, TaskStore};
