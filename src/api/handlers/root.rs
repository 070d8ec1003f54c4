//! Undocumented landing route.

use axum::{response::IntoResponse, Json};

use super::auth::messages;
use super::auth::types::Message;

pub async fn root() -> impl IntoResponse {
    Json(Message::new(messages::WELCOME_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_returns_welcome_message() {
        let response = root().await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
