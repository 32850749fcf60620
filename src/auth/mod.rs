//! Authentication Module
//! Mission: Gate the admin area behind a single password and a signed session cookie

pub mod api;
pub mod cookies;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use api::AuthState;
pub use cookies::{CookieStore, JarStore, MemoryCookieStore, TOKEN_COOKIE};
pub use jwt::JwtHandler;
pub use middleware::admin_gate;
pub use password::AdminPassword;
pub use session::{AuthConfig, SessionAuthenticator};
