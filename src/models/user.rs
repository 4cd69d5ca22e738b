//! User identity model

use serde::{Deserialize, Serialize};

/// Role granted to an account by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, sees only its own tasks
    #[default]
    User,
    /// Administrator, sees every task
    Admin,
}

impl Role {
    /// Check whether this role grants access to all tasks
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Authenticated account identity as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned account id
    pub id: String,
    /// Login email
    pub email: String,
    /// Granted role
    pub role: Role,
}
