//! Refresh-token rotation endpoint.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use super::error::error_response;
use super::messages;
use super::types::{Detail, TokenResponse};
use super::utils::extract_bearer_token;
use super::SharedAuth;

/// Rotate a refresh token into a fresh token pair.
#[utoipa::path(
    get,
    path = "/v1/auth/refresh_token",
    responses(
        (status = 200, description = "Fresh token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid, expired, or rotated-out refresh token", body = Detail)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn refresh_token(headers: HeaderMap, auth: Extension<SharedAuth>) -> impl IntoResponse {
    let Some(token) = extract_bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(Detail::new(messages::NOT_VALIDATE_CREDENTIALS)),
        )
            .into_response();
    };

    match auth.refresh(&token).await {
        Ok(pair) => Json(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
        })
        .into_response(),
        Err(err) => error_response(&err),
    }
}
