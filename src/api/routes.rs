use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{
    api::site::{self, SiteState},
    auth::{api as auth_api, admin_gate, AuthState},
    middleware::{login_throttle, request_logging, LoginThrottle},
};

/// Create the application router.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`: the
/// request logger and the login throttle key on the client address.
pub fn create_router(auth_state: AuthState, site_state: SiteState, throttle: LoginThrottle) -> Router {
    // Auth routes (separate router with auth state)
    let auth_router = Router::new()
        .route(
            "/api/auth/login",
            post(auth_api::login).layer(middleware::from_fn_with_state(
                throttle,
                login_throttle,
            )),
        )
        .route("/api/auth/logout", post(auth_api::logout))
        .route("/api/auth/status", get(auth_api::status))
        .route("/api/auth/me", get(auth_api::me))
        .with_state(auth_state.clone());

    // Admin area, gated on a live session
    let admin_routes = Router::new()
        .route("/admin", get(site::admin_home))
        .route("/admin/*rest", get(site::admin_home))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&auth_state.authenticator),
            admin_gate,
        ));

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(site::health_check))
        .route("/login", get(site::login_page))
        .route("/api/ping", get(site::ping).post(site::ping_echo))
        .with_state(site_state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
