//! Portfolio Backend Library
//!
//! Admin session authentication and the HTTP surface of the portfolio site.
//! Exposed as a library so the binaries and integration tests share it.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
