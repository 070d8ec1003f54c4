//! Identity roles and the capability check gating protected routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::AuthError;

/// Role attached to every identity. Stored as lowercase text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored text form; unknown values are rejected so a
    /// corrupted row surfaces loudly instead of granting a default role.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "moderator" => Some(Self::Moderator),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Single capability check: is this role one of the allowed ones?
    #[must_use]
    pub fn allowed(self, required: &[Self]) -> bool {
        required.contains(&self)
    }
}

/// Handler-side guard mapping a failed capability check to `Forbidden`.
pub fn require_role(role: Role, required: &[Role]) -> Result<(), AuthError> {
    if role.allowed(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
