//! Login and logout endpoints.

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
use super::types::{Detail, LoginRequest, Message, TokenResponse};
use super::utils::{extract_bearer_token, extract_client_ip};
use super::SharedAuth;

/// Exchange credentials for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Unknown email, unverified email, or bad password", body = Detail),
        (status = 403, description = "Account is banned", body = Detail),
        (status = 429, description = "Rate limited", body = Detail)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    auth: Extension<SharedAuth>,
    limiter: Extension<Arc<dyn RateLimiter>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (StatusCode::BAD_REQUEST, Json(Detail::new("Missing payload")))
                .into_response()
        }
    };

    let client_ip = extract_client_ip(&headers);
    if limiter.check_ip(client_ip.as_deref(), RateLimitAction::Login) == RateLimitDecision::Limited
    {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(Detail::new(messages::TOO_MANY_REQUESTS)),
        )
            .into_response();
    }

    match auth.authenticate(&request.email, &request.password).await {
        Ok(pair) => Json(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
        })
        .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Revoke the presented access token. Idempotent.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = Message),
        (status = 401, description = "Missing bearer token", body = Detail),
        (status = 500, description = "Revocation could not be recorded", body = Detail)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, auth: Extension<SharedAuth>) -> impl IntoResponse {
    let Some(token) = extract_bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(Detail::new(messages::NOT_VALIDATE_CREDENTIALS)),
        )
            .into_response();
    };

    match auth.logout(&token).await {
        Ok(()) => Json(Message::new(messages::USER_IS_LOGOUT)).into_response(),
        Err(err) => error_response(&err),
    }
}
