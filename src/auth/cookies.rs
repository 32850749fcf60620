//! Cookie storage seam between the HTTP layer and the session authenticator.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;

/// Cookie carrying the signed session credential
pub const TOKEN_COOKIE: &str = "auth-token";

/// Per-request cookie storage (get/set/delete by name)
pub trait CookieStore {
    fn get_value(&self, name: &str) -> Option<String>;
    fn set(&mut self, cookie: Cookie<'static>);
    fn remove(&mut self, name: &str);
}

/// Build the session cookie with the attributes every caller must reproduce.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Adapter over axum-extra's `CookieJar`. Mutations land in the jar's delta and
/// become `Set-Cookie` headers once the jar is returned from a handler.
#[derive(Debug, Default)]
pub struct JarStore {
    jar: CookieJar,
}

impl JarStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl CookieStore for JarStore {
    fn get_value(&self, name: &str) -> Option<String> {
        self.jar.get(name).map(|c| c.value().to_string())
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }

    fn remove(&mut self, name: &str) {
        let removal = Cookie::build((name.to_string(), "")).path("/");
        self.jar = std::mem::take(&mut self.jar).remove(removal);
    }
}

/// In-memory store for exercising the authenticator without HTTP.
#[derive(Debug, Default, Clone)]
pub struct MemoryCookieStore {
    cookies: HashMap<String, Cookie<'static>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get_value(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|c| c.value().to_string())
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        self.cookies.insert(cookie.name().to_string(), cookie);
    }

    fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }
}
