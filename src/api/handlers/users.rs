//! Protected user routes.

use axum::{
    extract::Extension,
    http::HeaderMap,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;

use super::auth::directory::list_identities;
use super::auth::error::{error_response, AuthError};
use super::auth::messages;
use super::auth::roles::{require_role, Role};
use super::auth::types::{Detail, UserSummary};
use super::auth::utils::extract_bearer_token;
use super::auth::SharedAuth;

const LIST_LIMIT: i64 = 100;

/// Profile of the identity behind the presented access token.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    responses(
        (status = 200, description = "Current user profile", body = UserSummary),
        (status = 401, description = "Missing, invalid, or revoked token", body = Detail),
        (status = 403, description = "Account is banned", body = Detail)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn me(headers: HeaderMap, auth: Extension<SharedAuth>) -> impl IntoResponse {
    let identity = match require_identity(&headers, &auth).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    Json(UserSummary::from(&identity)).into_response()
}

/// List registered users; restricted to admins and moderators.
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "Registered users, newest first", body = [UserSummary]),
        (status = 401, description = "Missing, invalid, or revoked token", body = Detail),
        (status = 403, description = "Caller lacks the required role", body = Detail)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users(
    headers: HeaderMap,
    auth: Extension<SharedAuth>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let identity = match require_identity(&headers, &auth).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(err) = require_role(identity.role, &[Role::Admin, Role::Moderator]) {
        return error_response(&err);
    }

    match list_identities(&pool, LIST_LIMIT).await {
        Ok(identities) => {
            let users: Vec<UserSummary> = identities.iter().map(UserSummary::from).collect();
            Json(users).into_response()
        }
        Err(err) => error_response(&AuthError::Unavailable(err)),
    }
}

async fn require_identity(
    headers: &HeaderMap,
    auth: &SharedAuth,
) -> Result<super::auth::Identity, axum::response::Response> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(Detail::new(messages::NOT_VALIDATE_CREDENTIALS)),
        )
            .into_response());
    };

    auth.resolve_current_identity(&token)
        .await
        .map_err(|err| error_response(&err))
}
