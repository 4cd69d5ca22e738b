//! State stores
//!
//! Two single-writer stores mediate between server responses and UI-visible
//! state: [`SessionStore`] owns the authenticated identity, [`TaskStore`]
//! owns the mirrored task collection. Both follow the same shape: a plain
//! state struct, a tagged action enum, a pure `apply` transition, and async
//! operations that decide which actions to dispatch. Operations never return
//! errors to the caller; failures become `state.error`.

pub mod session;
pub mod tasks;

pub use session::{SessionAction, SessionState, SessionStore};
pub use tasks::{TaskAction, TaskState, TaskStore};
