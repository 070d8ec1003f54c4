//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::directory::Identity;
use super::roles::Role;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RequestEmailRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
}

impl From<&Identity> for UserSummary {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            is_verified: identity.verified,
            is_active: identity.active,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub user: UserSummary,
    pub detail: String,
}

/// `{"message": ...}` envelope for informational responses.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Message {
    pub message: String,
}

impl Message {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// `{"detail": ...}` envelope for error responses.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    #[must_use]
    pub fn new(detail: &str) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use uuid::Uuid;

    #[test]
    fn signup_request_round_trips() -> Result<()> {
        let request = SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: SignupRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.username, "alice");
        Ok(())
    }

    #[test]
    fn user_summary_from_identity() {
        let identity = Identity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "digest".to_string(),
            role: Role::Admin,
            verified: true,
            active: true,
            refresh_token: Some("token".to_string()),
        };
        let summary = UserSummary::from(&identity);
        assert_eq!(summary.id, identity.id.to_string());
        assert_eq!(summary.role, Role::Admin);
        assert!(summary.is_verified);

        // The digest and refresh token never appear in the wire form.
        let value = serde_json::to_value(&summary);
        assert!(value.is_ok());
        if let Ok(value) = value {
            assert!(value.get("password_hash").is_none());
            assert!(value.get("refresh_token").is_none());
        }
    }
}
