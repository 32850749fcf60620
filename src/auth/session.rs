//! Session Authenticator
//! Mission: Decide, per request, whether the submitted cookie carries a live admin session

use crate::auth::{
    cookies::{session_cookie, CookieStore, TOKEN_COOKIE},
    jwt::JwtHandler,
    models::{CurrentUser, SessionState, TokenPayload},
};
use anyhow::Result;
use chrono::Utc;
use tracing::debug;

/// Process-wide authenticator settings, loaded once at startup
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub secure_cookies: bool,
}

/// Holds the signing secret; all session state comes from the cookie store.
pub struct SessionAuthenticator {
    jwt: JwtHandler,
    secure_cookies: bool,
}

impl SessionAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwt: JwtHandler::new(&config.jwt_secret),
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn jwt(&self) -> &JwtHandler {
        &self.jwt
    }

    /// Signed credential for `subject`, valid for seven days
    pub fn issue_credential(&self, subject: &str, role: &str) -> Result<String> {
        self.jwt.issue(subject, role)
    }

    pub fn validate_credential(&self, token: &str) -> Option<TokenPayload> {
        self.jwt.validate(token)
    }

    /// Issue a credential and hand it to the store as the session cookie.
    pub fn establish<S: CookieStore + ?Sized>(
        &self,
        store: &mut S,
        subject: &str,
        role: &str,
    ) -> Result<()> {
        let token = self.issue_credential(subject, role)?;
        store.set(session_cookie(token, self.jwt.ttl_secs(), self.secure_cookies));
        Ok(())
    }

    /// Removing an absent cookie is a no-op.
    pub fn revoke<S: CookieStore + ?Sized>(&self, store: &mut S) {
        store.remove(TOKEN_COOKIE);
    }

    pub fn is_authenticated<S: CookieStore + ?Sized>(&self, store: &S) -> bool {
        self.current_payload(store).is_some()
    }

    pub fn current_user<S: CookieStore + ?Sized>(&self, store: &S) -> Option<CurrentUser> {
        self.current_payload(store).map(CurrentUser::from)
    }

    pub fn session_state<S: CookieStore + ?Sized>(&self, store: &S) -> SessionState {
        match store.get_value(TOKEN_COOKIE).filter(|t| !t.is_empty()) {
            None => SessionState::NoCredential,
            Some(token) if self.validate_credential(&token).is_some() => {
                SessionState::ValidCredential
            }
            Some(_) => SessionState::ExpiredOrInvalidCredential,
        }
    }

    fn current_payload<S: CookieStore + ?Sized>(&self, store: &S) -> Option<TokenPayload> {
        let token = store.get_value(TOKEN_COOKIE).filter(|t| !t.is_empty())?;
        let payload = self.jwt.validate_at(&token, Utc::now().timestamp());
        if payload.is_none() {
            debug!("Session cookie present but not valid");
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{cookies::MemoryCookieStore, models::DEFAULT_ROLE};
    use axum_extra::extract::cookie::Cookie;

    fn authenticator(secret: &str) -> SessionAuthenticator {
        SessionAuthenticator::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            secure_cookies: false,
        })
    }

    #[test]
    fn test_no_cookie_is_not_authenticated() {
        let auth = authenticator("s3cret");
        let store = MemoryCookieStore::new();

        assert!(!auth.is_authenticated(&store));
        assert!(auth.current_user(&store).is_none());
        assert_eq!(auth.session_state(&store), SessionState::NoCredential);
    }

    #[test]
    fn test_fresh_session_is_authenticated() {
        let auth = authenticator("s3cret");
        let mut store = MemoryCookieStore::new();

        auth.establish(&mut store, "admin", DEFAULT_ROLE).unwrap();

        assert!(auth.is_authenticated(&store));
        assert_eq!(auth.session_state(&store), SessionState::ValidCredential);
        let user = auth.current_user(&store).unwrap();
        assert_eq!(user.id, "admin");
        assert_eq!(user.role, "admin");

        let cookie = store.cookie(TOKEN_COOKIE).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_expired_cookie_is_not_authenticated() {
        let auth = authenticator("s3cret");
        let expired = auth
            .jwt()
            .sign(&TokenPayload {
                user_id: "admin".to_string(),
                role: "admin".to_string(),
                exp: Utc::now().timestamp() - 10,
            })
            .unwrap();

        let mut store = MemoryCookieStore::new();
        store.set(Cookie::new(TOKEN_COOKIE, expired));

        assert!(!auth.is_authenticated(&store));
        assert!(auth.current_user(&store).is_none());
        assert_eq!(
            auth.session_state(&store),
            SessionState::ExpiredOrInvalidCredential
        );
    }

    #[test]
    fn test_garbage_cookie_fails_closed() {
        let auth = authenticator("s3cret");
        let mut store = MemoryCookieStore::new();
        store.set(Cookie::new(TOKEN_COOKIE, "not-a-jwt"));

        assert!(!auth.is_authenticated(&store));
        assert_eq!(
            auth.session_state(&store),
            SessionState::ExpiredOrInvalidCredential
        );
    }

    #[test]
    fn test_empty_cookie_counts_as_no_credential() {
        let auth = authenticator("s3cret");
        let mut store = MemoryCookieStore::new();
        store.set(Cookie::new(TOKEN_COOKIE, ""));

        assert!(!auth.is_authenticated(&store));
        assert!(auth.current_user(&store).is_none());
        assert_eq!(auth.session_state(&store), SessionState::NoCredential);
    }

    #[test]
    fn test_rotated_secret_invalidates_session() {
        let old = authenticator("old-secret");
        let new = authenticator("new-secret");
        let mut store = MemoryCookieStore::new();

        old.establish(&mut store, "admin", DEFAULT_ROLE).unwrap();

        assert!(old.is_authenticated(&store));
        assert!(!new.is_authenticated(&store));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let auth = authenticator("s3cret");
        let mut store = MemoryCookieStore::new();
        auth.establish(&mut store, "admin", DEFAULT_ROLE).unwrap();

        auth.revoke(&mut store);
        let once = auth.session_state(&store);
        auth.revoke(&mut store);
        let twice = auth.session_state(&store);

        assert_eq!(once, SessionState::NoCredential);
        assert_eq!(once, twice);
        assert!(store.is_empty());
    }
}
