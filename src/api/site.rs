//! Public and admin page endpoints the portfolio front-end calls into.

use crate::auth::models::CurrentUser;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct SiteState {
    pub environment: Arc<str>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/ping
pub async fn ping(State(state): State<SiteState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": &*state.environment,
        "message": "Server is running and responding to requests",
    }))
}

/// POST /api/ping - echoes the request body
pub async fn ping_echo(State(state): State<SiteState>, body: String) -> Json<Value> {
    debug!(bytes = body.len(), "Ping POST received");

    let body = if body.is_empty() {
        "No body provided".to_string()
    } else {
        body
    };

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": &*state.environment,
        "method": "POST",
        "body": body,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub from: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub login_endpoint: &'static str,
    pub return_to: String,
}

/// GET /login - where gated requests are redirected
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Json<LoginPage> {
    // Only same-site paths are honoured as return targets
    let return_to = query
        .from
        .filter(|from| from.starts_with('/') && !from.starts_with("//"))
        .unwrap_or_else(|| "/admin".to_string());

    Json(LoginPage {
        login_endpoint: "/api/auth/login",
        return_to,
    })
}

/// GET /admin and everything under it, behind `admin_gate`
pub async fn admin_home(Extension(user): Extension<CurrentUser>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to the admin area",
        "user": {
            "id": &user.id,
            "role": &user.role,
            "displayRole": user.display_role(),
        },
    }))
}
