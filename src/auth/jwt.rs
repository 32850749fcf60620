//! JWT Token Handler
//! Mission: Issue and validate signed, time-limited session credentials

use crate::auth::models::TokenPayload;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Seven days, in seconds
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a credential for `subject`, expiring one TTL from now
    pub fn issue(&self, subject: &str, role: &str) -> Result<String> {
        self.issue_at(subject, role, Utc::now().timestamp())
    }

    pub fn issue_at(&self, subject: &str, role: &str, now: i64) -> Result<String> {
        let payload = TokenPayload {
            user_id: subject.to_string(),
            role: role.to_string(),
            exp: now
                .checked_add(self.ttl_secs)
                .context("Invalid timestamp")?,
        };

        debug!(
            "Issuing session token for {} ({}), expires at {}",
            payload.user_id, payload.role, payload.exp
        );

        self.sign(&payload)
    }

    /// Sign an arbitrary payload as-is
    pub fn sign(&self, payload: &TokenPayload) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), payload, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate a token against the current clock
    pub fn validate(&self, token: &str) -> Option<TokenPayload> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Verify the signature, then re-check `exp` against `now` on the decoded
    /// payload. Every failure collapses to `None`.
    pub fn validate_at(&self, token: &str, now: i64) -> Option<TokenPayload> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let payload = match decode::<TokenPayload>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Session token rejected: {}", e);
                return None;
            }
        };

        if !payload.is_live_at(now) {
            debug!(
                "Session token for {} expired at {} (now {})",
                payload.user_id, payload.exp, now
            );
            return None;
        }

        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    #[test]
    fn test_issue_and_validate() {
        let handler = JwtHandler::new(SECRET);
        let now = Utc::now().timestamp();

        let token = handler.issue_at("admin", "admin", now).unwrap();
        assert!(!token.is_empty());

        let payload = handler.validate(&token).unwrap();
        assert_eq!(payload.user_id, "admin");
        assert_eq!(payload.role, "admin");
        assert_eq!(payload.exp, now + 604_800);
    }

    #[test]
    fn test_issued_role_is_preserved() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue("visitor-7", "editor").unwrap();

        let payload = handler.validate(&token).unwrap();
        assert_eq!(payload.user_id, "visitor-7");
        assert_eq!(payload.role, "editor");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = JwtHandler::new(SECRET);

        assert!(handler.validate("invalid.token.here").is_none());
        assert!(handler.validate("").is_none());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1");
        let handler2 = JwtHandler::new("secret2");

        let token = handler1.issue("admin", "admin").unwrap();

        assert!(handler1.validate(&token).is_some());
        assert!(handler2.validate(&token).is_none());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue("admin", "admin").unwrap();

        let other = handler.issue("someone-else", "admin").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(handler.validate(&spliced).is_none());
    }

    #[test]
    fn test_signed_but_expired_token_rejected() {
        let handler = JwtHandler::new(SECRET);
        let past = TokenPayload {
            user_id: "admin".to_string(),
            role: "admin".to_string(),
            exp: Utc::now().timestamp() - 3600,
        };
        let token = handler.sign(&past).unwrap();

        assert!(handler.validate(&token).is_none());
    }

    #[test]
    fn test_expiry_rechecked_after_signature() {
        let handler = JwtHandler::new(SECRET);
        let now = Utc::now().timestamp();
        let token = handler.issue_at("admin", "admin", now).unwrap();

        // The signature still verifies with the library clock, but the decoded
        // `exp` is not in the future relative to the supplied instant.
        assert!(handler.validate_at(&token, now + 604_799).is_some());
        assert!(handler.validate_at(&token, now + 604_800).is_none());
        assert!(handler.validate_at(&token, now + 604_801).is_none());
    }
}
