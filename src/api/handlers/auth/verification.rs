//! Email confirmation endpoints.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::error::{error_response, AuthError};
use super::messages;
use super::rate_limit::{RateLimitAction, RateLimitDecision, RateLimiter};
use super::service::{Confirmation, VerificationRequest};
use super::types::{Detail, Message, RequestEmailRequest};
use super::utils::{extract_client_ip, normalize_email, valid_email};
use super::SharedAuth;

/// Confirm an email address via the token from the verification link.
/// Confirming an already-confirmed address reports success again.
#[utoipa::path(
    get,
    path = "/v1/auth/confirmed_email/{token}",
    params(
        ("token" = String, Path, description = "Email verification token")
    ),
    responses(
        (status = 200, description = "Email confirmed (or was already confirmed)", body = Message),
        (status = 400, description = "Token subject no longer exists", body = Detail),
        (status = 401, description = "Invalid or expired token", body = Detail)
    ),
    tag = "auth"
)]
pub async fn confirmed_email(
    auth: Extension<SharedAuth>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match auth.confirm_email(token.trim()).await {
        Ok(Confirmation::Confirmed) => {
            Json(Message::new(messages::EMAIL_CONFIRMED)).into_response()
        }
        Ok(Confirmation::AlreadyConfirmed) => {
            Json(Message::new(messages::EMAIL_ALREADY_CONFIRMED)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Re-send the verification email for an unconfirmed account.
#[utoipa::path(
    post,
    path = "/v1/auth/request_email",
    request_body = RequestEmailRequest,
    responses(
        (status = 200, description = "Verification email queued or already confirmed", body = Message),
        (status = 404, description = "No account under this email", body = Detail),
        (status = 429, description = "Rate limited", body = Detail)
    ),
    tag = "auth"
)]
pub async fn request_email(
    headers: HeaderMap,
    auth: Extension<SharedAuth>,
    limiter: Extension<Arc<dyn RateLimiter>>,
    payload: Option<Json<RequestEmailRequest>>,
) -> impl IntoResponse {
    let request: RequestEmailRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, Json(Detail::new("Missing payload")))
                .into_response()
        }
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(Detail::new(messages::INVALID_EMAIL)),
        )
            .into_response();
    }

    if limiter.check_email(&email, RateLimitAction::RequestEmail) == RateLimitDecision::Limited {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Detail::new(messages::TOO_MANY_REQUESTS)),
        )
            .into_response();
    }

    let client_ip = extract_client_ip(&headers);
    if limiter.check_ip(client_ip.as_deref(), RateLimitAction::RequestEmail)
        == RateLimitDecision::Limited
    {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Detail::new(messages::TOO_MANY_REQUESTS)),
        )
            .into_response();
    }

    match auth.request_email_verification(&email).await {
        Ok(VerificationRequest::Sent) => {
            Json(Message::new(messages::CHECK_YOUR_EMAIL)).into_response()
        }
        Ok(VerificationRequest::AlreadyConfirmed) => {
            Json(Message::new(messages::EMAIL_ALREADY_CONFIRMED)).into_response()
        }
        // Unlike login, this route reports unknown emails as 404.
        Err(AuthError::UnknownIdentity) => (
            StatusCode::NOT_FOUND,
            Json(Detail::new(messages::INVALID_EMAIL)),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}
