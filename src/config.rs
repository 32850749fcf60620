//! Application configuration, read once from the environment at startup.

use crate::{auth::AuthConfig, middleware::LoginThrottleConfig};
use anyhow::{bail, Context, Result};
use std::{env, time::Duration};

/// Upper bound for `LOGIN_RATE_LIMIT_MAX`.
pub const MAX_LOGIN_ATTEMPTS: u32 = 10_000;
/// Upper bound for `LOGIN_RATE_LIMIT_WINDOW_SECS` (one day).
pub const MAX_LOGIN_WINDOW_SECS: u64 = 86_400;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub environment: String,
    pub jwt_secret: String,
    pub admin_password_hash: Option<String>,
    pub login_rate_limit: LoginThrottleConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(jwt_secret) = non_empty("JWT_SECRET") else {
            bail!("JWT_SECRET must be set; sessions cannot be signed without it");
        };

        let environment = non_empty("APP_ENV")
            .or_else(|| non_empty("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let defaults = LoginThrottleConfig::default();
        let max_attempts = match non_empty("LOGIN_RATE_LIMIT_MAX") {
            Some(v) => v
                .parse::<u32>()
                .context("Invalid LOGIN_RATE_LIMIT_MAX")?,
            None => defaults.max_attempts,
        };
        if max_attempts > MAX_LOGIN_ATTEMPTS {
            bail!("LOGIN_RATE_LIMIT_MAX must be at most {}", MAX_LOGIN_ATTEMPTS);
        }
        let window_secs = match non_empty("LOGIN_RATE_LIMIT_WINDOW_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("Invalid LOGIN_RATE_LIMIT_WINDOW_SECS")?,
            None => defaults.window.as_secs(),
        };
        if window_secs == 0 || window_secs > MAX_LOGIN_WINDOW_SECS {
            bail!(
                "LOGIN_RATE_LIMIT_WINDOW_SECS must be between 1 and {}",
                MAX_LOGIN_WINDOW_SECS
            );
        }

        Ok(Self {
            bind_addr,
            environment,
            jwt_secret,
            admin_password_hash: non_empty("ADMIN_PASSWORD_HASH"),
            login_rate_limit: LoginThrottleConfig {
                max_attempts,
                window: Duration::from_secs(window_secs),
                burst: defaults.burst,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            secure_cookies: self.is_production(),
        }
    }
}
