//! API envelope and auth payloads
//!
//! Every business endpoint wraps its result in [`ApiResponse`]; transport
//! failures never reach this layer (they surface as `ApiError`).

use serde::{Deserialize, Serialize};

use super::user::{Role, User};

/// Structured envelope returned by every business endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded logically
    pub success: bool,

    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Server-supplied error message, present on logical failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional application error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Build a success envelope (used by tests and fakes)
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    /// Build a logical-failure envelope
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }
}

/// Login/registration success payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Account id
    pub user_id: String,
    /// Account email
    pub email: String,
    /// Granted role
    pub role: Role,
}

impl AuthResponse {
    /// Extract the identity carried by this payload
    #[must_use]
    pub fn user(&self) -> User {
        User {
            id: self.user_id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Credentials for `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /register`; same shape as login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}
