//! Authentication API Endpoints
//! Mission: Provide login, logout, status and identity endpoints

use crate::auth::{
    cookies::JarStore,
    models::{LoginRequest, MeResponse, StatusResponse, DEFAULT_ROLE},
    password::AdminPassword,
    session::SessionAuthenticator,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Subject recorded in credentials issued by the password login
pub const ADMIN_SUBJECT: &str = "admin";

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<SessionAuthenticator>,
    pub admin_password: Arc<AdminPassword>,
}

impl AuthState {
    pub fn new(authenticator: Arc<SessionAuthenticator>, admin_password: Arc<AdminPassword>) -> Self {
        Self {
            authenticator,
            admin_password,
        }
    }
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), AuthApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected login body: {}", e);
        AuthApiError::PasswordRequired
    })?;

    if payload.password.is_empty() {
        return Err(AuthApiError::PasswordRequired);
    }

    info!("🔐 Admin login attempt");

    // bcrypt is CPU-bound; run it off the async workers
    let admin_password = state.admin_password.clone();
    let valid = tokio::task::spawn_blocking(move || admin_password.verify(&payload.password))
        .await
        .map_err(|e| {
            error!("Password check task failed: {}", e);
            AuthApiError::InternalError
        })?;

    if !valid {
        warn!("❌ Failed admin login attempt");
        return Err(AuthApiError::InvalidCredentials);
    }

    let mut store = JarStore::new(jar);
    state
        .authenticator
        .establish(&mut store, ADMIN_SUBJECT, DEFAULT_ROLE)
        .map_err(|e| {
            error!("Failed to issue session token: {:#}", e);
            AuthApiError::InternalError
        })?;

    info!("✅ Admin login successful");

    Ok((store.into_jar(), Json(json!({ "success": true }))))
}

/// Logout endpoint - POST /api/auth/logout
pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let mut store = JarStore::new(jar);
    state.authenticator.revoke(&mut store);

    info!("👋 Session cookie cleared");

    (store.into_jar(), Json(json!({ "success": true })))
}

/// Session status - GET /api/auth/status
pub async fn status(State(state): State<AuthState>, jar: CookieJar) -> Json<StatusResponse> {
    let store = JarStore::new(jar);
    Json(StatusResponse {
        authenticated: state.authenticator.is_authenticated(&store),
    })
}

/// Current identity - GET /api/auth/me
pub async fn me(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<Json<MeResponse>, AuthApiError> {
    let store = JarStore::new(jar);
    let user = state
        .authenticator
        .current_user(&store)
        .ok_or(AuthApiError::Unauthorized)?;

    Ok(Json(MeResponse {
        is_authenticated: true,
        user: Some(user),
    }))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    PasswordRequired,
    InvalidCredentials,
    Unauthorized,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthApiError::PasswordRequired => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Password is required" }),
            ),
            AuthApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            ),
            AuthApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "isAuthenticated": false }))
            }
            AuthApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
