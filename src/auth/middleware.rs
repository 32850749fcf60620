//! Authentication Middleware
//! Mission: Gate the admin area behind a valid session cookie

use crate::auth::{cookies::JarStore, models::CurrentUser, session::SessionAuthenticator};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Paths under this prefix require a session
pub const PROTECTED_PREFIX: &str = "/admin";

/// Login surface unauthenticated visitors are sent to
pub const LOGIN_PATH: &str = "/login";

pub fn is_protected_path(path: &str) -> bool {
    path == PROTECTED_PREFIX
        || path
            .strip_prefix(PROTECTED_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Login URL that returns the visitor to `path` afterwards
pub fn login_redirect_target(path: &str) -> String {
    format!("{}?from={}", LOGIN_PATH, urlencoding::encode(path))
}

/// Redirects to the login surface when the request carries no live session;
/// otherwise exposes the `CurrentUser` to handlers through request extensions.
pub async fn admin_gate(
    State(authenticator): State<Arc<SessionAuthenticator>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !is_protected_path(&path) {
        return next.run(req).await;
    }

    let store = JarStore::new(jar);
    match authenticator.current_user(&store) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            debug!(path = %path, "No session for protected path, redirecting to login");
            Redirect::to(&login_redirect_target(&path)).into_response()
        }
    }
}

/// Extract the session user from request (use after `admin_gate`)
pub fn extract_user(req: &Request) -> Option<&CurrentUser> {
    req.extensions().get::<CurrentUser>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_protected_path_matching() {
        assert!(is_protected_path("/admin"));
        assert!(is_protected_path("/admin/"));
        assert!(is_protected_path("/admin/projects"));
        assert!(!is_protected_path("/administrator"));
        assert!(!is_protected_path("/"));
        assert!(!is_protected_path("/login"));
    }

    #[test]
    fn test_login_redirect_preserves_path() {
        assert_eq!(login_redirect_target("/admin"), "/login?from=%2Fadmin");
        assert_eq!(
            login_redirect_target("/admin/projects"),
            "/login?from=%2Fadmin%2Fprojects"
        );
    }

    #[test]
    fn test_extract_user_from_request() {
        let mut req = Request::new(Body::empty());
        assert!(extract_user(&req).is_none());

        req.extensions_mut().insert(CurrentUser {
            id: "admin".to_string(),
            role: "admin".to_string(),
        });

        let user = extract_user(&req).unwrap();
        assert_eq!(user.id, "admin");
    }
}
