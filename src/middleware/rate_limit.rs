//! Login throttling middleware.
//!
//! Counts password attempts per client IP in a fixed window. Past the soft
//! limit attempts still go through but are logged; past the soft limit plus
//! burst they are refused with 429 until the window rolls over.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Configuration for login throttling.
#[derive(Debug, Clone)]
pub struct LoginThrottleConfig {
    /// Attempts per window before warnings start.
    pub max_attempts: u32,
    /// Window duration.
    pub window: Duration,
    /// Extra attempts tolerated above `max_attempts` before refusing.
    pub burst: u32,
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            window: Duration::from_secs(60),
            burst: 5,
        }
    }
}

impl LoginThrottleConfig {
    fn hard_limit(&self) -> u32 {
        self.max_attempts.saturating_add(self.burst)
    }
}

/// Attempt counters keyed by client IP.
#[derive(Clone)]
pub struct LoginThrottle {
    config: LoginThrottleConfig,
    attempts: Arc<Mutex<HashMap<IpAddr, AttemptWindow>>>,
}

struct AttemptWindow {
    attempts: u32,
    opened_at: Instant,
}

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Allowed,
    SoftLimited,
    Blocked { retry_after: Duration },
}

impl LoginThrottle {
    pub fn new(config: LoginThrottleConfig) -> Self {
        Self {
            config,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.config.window
    }

    fn record_attempt(&self, ip: IpAddr) -> Verdict {
        self.record_attempt_at(ip, Instant::now())
    }

    fn record_attempt_at(&self, ip: IpAddr, now: Instant) -> Verdict {
        let window = self.config.window;
        let mut attempts = self.attempts.lock();

        let slot = attempts.entry(ip).or_insert(AttemptWindow {
            attempts: 0,
            opened_at: now,
        });

        if now.saturating_duration_since(slot.opened_at) >= window {
            slot.attempts = 0;
            slot.opened_at = now;
        }
        slot.attempts = slot.attempts.saturating_add(1);

        if slot.attempts > self.config.hard_limit() {
            // A window too long to represent as an Instant never reopens;
            // report the full window as the wait.
            let retry_after = slot
                .opened_at
                .checked_add(window)
                .map(|reopens| reopens.saturating_duration_since(now))
                .unwrap_or(window);
            Verdict::Blocked { retry_after }
        } else if slot.attempts > self.config.max_attempts {
            Verdict::SoftLimited
        } else {
            Verdict::Allowed
        }
    }

    /// Forget clients idle for two windows (called from a background task).
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    fn cleanup_at(&self, now: Instant) {
        let idle_after = self.config.window.saturating_mul(2);
        self.attempts
            .lock()
            .retain(|_, slot| now.saturating_duration_since(slot.opened_at) < idle_after);
    }

    pub fn tracked_clients(&self) -> usize {
        self.attempts.lock().len()
    }
}

/// Throttle applied in front of the login handler.
pub async fn login_throttle(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(throttle): State<LoginThrottle>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = addr.ip();

    match throttle.record_attempt(ip) {
        Verdict::Allowed => next.run(request).await,
        Verdict::SoftLimited => {
            warn!(ip = %ip, "Login attempts above soft limit");
            next.run(request).await
        }
        Verdict::Blocked { retry_after } => {
            let retry_secs = retry_after.as_secs().max(1);
            warn!(ip = %ip, retry_after_secs = retry_secs, "Login attempts blocked");

            let body = serde_json::json!({
                "error": "Too many login attempts. Please try again later.",
                "retry_after_seconds": retry_secs,
            });

            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", retry_secs.to_string())],
                Json(body),
            )
                .into_response()
        }
    }
}
