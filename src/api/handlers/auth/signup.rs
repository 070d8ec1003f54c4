//! Account registration endpoint.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::error::error_response;
use super::messages;
use super::rate_limit::{RateLimitAction, RateLimitDecision, RateLimiter};
use super::types::{Detail, SignupRequest, SignupResponse, UserSummary};
use super::utils::{extract_client_ip, normalize_email, valid_email};
use super::SharedAuth;

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;

/// Register a new account and queue the verification email.
#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid payload", body = Detail),
        (status = 409, description = "Account already exists", body = Detail),
        (status = 429, description = "Rate limited", body = Detail)
    ),
    tag = "auth"
)]
pub async fn signup(
    headers: HeaderMap,
    auth: Extension<SharedAuth>,
    limiter: Extension<Arc<dyn RateLimiter>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
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

    let username = request.username.trim();
    if username.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(Detail::new("Missing username"))).into_response();
    }

    if request.password.len() < MIN_PASSWORD_LENGTH {
        return (
            StatusCode::BAD_REQUEST,
            Json(Detail::new("Password is too short")),
        )
            .into_response();
    }

    let client_ip = extract_client_ip(&headers);
    if limiter.check_ip(client_ip.as_deref(), RateLimitAction::Signup) == RateLimitDecision::Limited
    {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Detail::new(messages::TOO_MANY_REQUESTS)),
        )
            .into_response();
    }

    match auth.register(&email, &request.password, username).await {
        Ok(identity) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                user: UserSummary::from(&identity),
                detail: messages::SUCCESS_CREATE_USER.to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}
