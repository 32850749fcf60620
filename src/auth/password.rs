//! Admin Password Check
//! Mission: Compare submitted passwords against the configured bcrypt reference

use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use tracing::{error, warn};

/// Reference secret gating the admin area. Holds only a bcrypt hash.
pub struct AdminPassword {
    hash: Option<String>,
}

impl AdminPassword {
    /// `None` or a blank value means the deployment is missing its reference
    /// secret; every check then fails.
    pub fn new(hash: Option<String>) -> Self {
        let hash = hash
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        if hash.is_none() {
            error!("ADMIN_PASSWORD_HASH not configured - admin login is disabled");
        }

        Self { hash }
    }

    pub fn is_configured(&self) -> bool {
        self.hash.is_some()
    }

    /// bcrypt digest comparison is constant-time; a malformed reference hash
    /// counts as a mismatch.
    pub fn verify(&self, candidate: &str) -> bool {
        let Some(reference) = self.hash.as_deref() else {
            warn!("Login rejected: no reference secret configured");
            return false;
        };

        match verify(candidate, reference) {
            Ok(valid) => valid,
            Err(e) => {
                error!("Reference password hash is unusable: {}", e);
                false
            }
        }
    }

    /// Produce a value suitable for `ADMIN_PASSWORD_HASH`
    pub fn hash(password: &str, cost: u32) -> Result<String> {
        hash(password, cost).context("Failed to hash password")
    }
}
