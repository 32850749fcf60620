//! Middleware for observability and login throttling.

pub mod logging;
pub mod rate_limit;

pub use logging::request_logging;
pub use rate_limit::{login_throttle, LoginThrottle, LoginThrottleConfig};
