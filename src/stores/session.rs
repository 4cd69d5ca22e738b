//! Session store
//!
//! Owns the current-user identity and bearer token, keeps durable storage and
//! in-memory state in lockstep, and restores the session across process
//! restarts. All remote operations record failures as state instead of
//! returning them.

use std::sync::{Arc, RwLock};

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::models::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest, User};
use crate::storage::{PersistedSession, SessionStorage};

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";
const REFRESH_FALLBACK: &str = "Failed to refresh session";

/// Read-only snapshot of the session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Authenticated identity, when logged in
    pub user: Option<User>,
    /// Bearer token, when logged in
    pub token: Option<String>,
    /// True iff `user` and `token` are both present
    pub is_authenticated: bool,
    /// An auth operation is in flight
    pub loading: bool,
    /// Human-readable failure from the last operation
    pub error: Option<String>,
}

/// State transitions of the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// An auth operation started
    Start,
    /// Login/register/refresh succeeded
    Success { user: User, token: String },
    /// An auth operation failed with a displayable message
    Failure(String),
    /// Reset to anonymous
    Logout,
    /// Drop the recorded error, touch nothing else
    ClearError,
}

impl SessionState {
    /// Pure transition function; the only way session state changes
    #[must_use]
    pub fn apply(self, action: SessionAction) -> Self {
        match action {
            SessionAction::Start => Self {
                loading: true,
                error: None,
                ..self
            },
            SessionAction::Success { user, token } => Self {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
                loading: false,
                error: None,
            },
            // Prior user/token are left as-is; only the authenticated flag
            // and the error change.
            SessionAction::Failure(message) => Self {
                is_authenticated: false,
                loading: false,
                error: Some(message),
                ..self
            },
            SessionAction::Logout => Self::default(),
            SessionAction::ClearError => Self { error: None, ..self },
        }
    }
}

/// Single-writer store for the authentication session
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: SessionStorage,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create the store, hydrating from persisted storage
    ///
    /// A readable persisted session restores the authenticated state without
    /// any network call; malformed persisted data is purged and the store
    /// starts anonymous.
    pub fn new(api: Arc<dyn AuthApi>, storage: SessionStorage) -> Self {
        let initial = match storage.load_or_purge() {
            Some(persisted) => {
                tracing::info!("Restored session for {}", persisted.user.email);
                SessionState::default().apply(SessionAction::Success {
                    user: persisted.user,
                    token: persisted.token,
                })
            }
            None => SessionState::default(),
        };

        Self {
            api,
            storage,
            state: RwLock::new(initial),
        }
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    fn dispatch(&self, action: SessionAction) {
        let mut guard = self.state.write().unwrap();
        *guard = std::mem::take(&mut *guard).apply(action);
    }

    /// Authenticate with email and password
    pub async fn login(&self, email: impl Into<String>, password: impl Into<String>) {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        self.dispatch(SessionAction::Start);
        let result = self.api.login(&request).await;
        self.finish_auth(result, LOGIN_FALLBACK);
    }

    /// Create an account; the server answers with an immediate session
    pub async fn register(&self, email: impl Into<String>, password: impl Into<String>) {
        let request = RegisterRequest {
            email: email.into(),
            password: password.into(),
        };
        self.dispatch(SessionAction::Start);
        let result = self.api.register(&request).await;
        self.finish_auth(result, REGISTER_FALLBACK);
    }

    /// Exchange the current token for a fresh one
    pub async fn refresh(&self) {
        self.dispatch(SessionAction::Start);
        let result = self.api.refresh().await;
        self.finish_auth(result, REFRESH_FALLBACK);
    }

    /// Log out locally no matter what the server says
    ///
    /// The remote call is best-effort; a failure there is logged and
    /// swallowed because the local session must always end.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!("Remote logout failed, clearing local session anyway: {err}");
        }
        if let Err(err) = self.storage.purge() {
            tracing::warn!("Failed to clear persisted session: {err}");
        }
        self.dispatch(SessionAction::Logout);
    }

    /// Probe whether the remote service is reachable and healthy
    ///
    /// Purely informational; session state is never touched.
    pub async fn health_check(&self) -> bool {
        match self.api.health().await {
            Ok(envelope) => envelope.success,
            Err(err) => {
                tracing::warn!("Health check failed: {err}");
                false
            }
        }
    }

    /// Drop the recorded error (called before a fresh submission)
    pub fn clear_error(&self) {
        self.dispatch(SessionAction::ClearError);
    }

    /// Shared success/failure handling for login, register and refresh.
    ///
    /// On success the session is persisted before the success action becomes
    /// observable, so memory never holds a token that storage does not.
    fn finish_auth(
        &self,
        result: Result<ApiResponse<AuthResponse>, ApiError>,
        fallback: &str,
    ) {
        match result {
            Ok(ApiResponse {
                success: true,
                data: Some(auth),
                ..
            }) => {
                let user = auth.user();
                let persisted = PersistedSession {
                    token: auth.token.clone(),
                    user: user.clone(),
                };
                if let Err(err) = self.storage.save(&persisted) {
                    tracing::error!("Failed to persist session: {err}");
                    self.dispatch(SessionAction::Failure(fallback.to_string()));
                    return;
                }
                self.dispatch(SessionAction::Success {
                    user,
                    token: auth.token,
                });
            }
            Ok(envelope) => {
                let message = envelope.error.unwrap_or_else(|| fallback.to_string());
                self.dispatch(SessionAction::Failure(message));
            }
            Err(err) => {
                tracing::warn!("Auth request failed: {err}");
                let message = err.user_message().unwrap_or_else(|| fallback.to_string());
                self.dispatch(SessionAction::Failure(message));
            }
        }
    }
}
