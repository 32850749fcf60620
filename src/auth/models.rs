//! Authentication Models
//! Mission: Define the session credential and the login boundary schema

use serde::{Deserialize, Serialize};

/// Role assigned when the caller does not specify one
pub const DEFAULT_ROLE: &str = "admin";

/// Signed credential payload carried inside the `auth-token` cookie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    #[serde(rename = "userId")]
    pub user_id: String, // subject identifier
    pub role: String,
    pub exp: i64, // expiration, epoch seconds
}

impl TokenPayload {
    /// Strictly-in-the-future expiration check
    pub fn is_live_at(&self, now: i64) -> bool {
        self.exp > now
    }
}

/// Identity exposed to pages (navigation, admin header)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
}

impl CurrentUser {
    pub fn display_role(&self) -> &'static str {
        if self.role.eq_ignore_ascii_case(DEFAULT_ROLE) {
            "Admin"
        } else {
            "User"
        }
    }
}

impl From<TokenPayload> for CurrentUser {
    fn from(payload: TokenPayload) -> Self {
        Self {
            id: payload.user_id,
            role: payload.role,
        }
    }
}

/// Per-request classification of the submitted cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoCredential,
    ValidCredential,
    ExpiredOrInvalidCredential,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response for `GET /api/auth/status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
}

/// Response for `GET /api/auth/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_names() {
        let payload = TokenPayload {
            user_id: "admin".to_string(),
            role: "admin".to_string(),
            exp: 1_700_000_000,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["userId"], "admin");
        assert_eq!(json["exp"], 1_700_000_000);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_expiration_is_strict() {
        let payload = TokenPayload {
            user_id: "admin".to_string(),
            role: "admin".to_string(),
            exp: 100,
        };
        assert!(payload.is_live_at(99));
        assert!(!payload.is_live_at(100));
        assert!(!payload.is_live_at(101));
    }

    #[test]
    fn test_display_role() {
        let admin = CurrentUser {
            id: "a".to_string(),
            role: "admin".to_string(),
        };
        let guest = CurrentUser {
            id: "b".to_string(),
            role: "editor".to_string(),
        };
        assert_eq!(admin.display_role(), "Admin");
        assert_eq!(guest.display_role(), "User");
    }

    #[test]
    fn test_me_response_omits_user_when_anonymous() {
        let json = serde_json::to_string(&MeResponse {
            is_authenticated: false,
            user: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"isAuthenticated":false}"#);
    }
}
