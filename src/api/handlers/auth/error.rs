//! Error taxonomy for the auth flows.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use std::fmt;
use tracing::error;

use super::messages;
use super::types::Detail;

/// Failures surfaced by the auth service.
///
/// Every variant except `Unavailable` is a distinct user-visible condition.
/// Infrastructure failures travel in `Unavailable` and are never reported as
/// an authentication failure.
#[derive(Debug)]
pub enum AuthError {
    /// An identity with this email already exists.
    AlreadyExists,
    /// The password did not match the stored digest.
    BadCredentials,
    /// No identity is registered under this email.
    UnknownIdentity,
    /// The identity exists but its email was never confirmed.
    NotVerified,
    /// The identity is deactivated (banned).
    Inactive,
    /// The token failed signature, expiry, scope, or blacklist checks.
    InvalidToken,
    /// An email confirmation token pointed at a missing identity.
    VerificationError,
    /// The identity lacks the role required for the operation.
    Forbidden,
    /// Database or other infrastructure failure.
    Unavailable(anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::BadCredentials
            | Self::UnknownIdentity
            | Self::NotVerified
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Inactive | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::VerificationError => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AlreadyExists => messages::ALREADY_EXISTS,
            Self::BadCredentials => messages::INVALID_PASSWORD,
            Self::UnknownIdentity => messages::INVALID_EMAIL,
            Self::NotVerified => messages::EMAIL_NOT_CONFIRMED,
            Self::Inactive => messages::USER_NOT_ACTIVE,
            Self::InvalidToken => messages::INVALID_TOKEN,
            Self::VerificationError => messages::VERIFICATION_ERROR,
            Self::Forbidden => messages::OPERATION_FORBIDDEN,
            Self::Unavailable(_) => messages::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "{}: {err}", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unavailable(err)
    }
}

/// Default HTTP rendering: status from the taxonomy, `{"detail": ...}` body.
/// Infrastructure failures are logged here; the response never carries them.
pub(crate) fn error_response(err: &AuthError) -> Response {
    if let AuthError::Unavailable(inner) = err {
        error!("auth operation failed: {inner:#}");
    }
    (err.status_code(), Json(Detail::new(err.message()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AuthError::AlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::BadCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::UnknownIdentity.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::NotVerified.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Inactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::VerificationError.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Unavailable(anyhow!("db down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unavailable_never_leaks_into_message() {
        let err = AuthError::Unavailable(anyhow!("connection refused (10.0.0.3:5432)"));
        assert_eq!(err.message(), messages::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn display_matches_user_message() {
        assert_eq!(
            AuthError::NotVerified.to_string(),
            messages::EMAIL_NOT_CONFIRMED
        );
        assert_eq!(AuthError::InvalidToken.to_string(), messages::INVALID_TOKEN);
    }
}
