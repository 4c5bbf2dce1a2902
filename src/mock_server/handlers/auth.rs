//! Login endpoint handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::detail;
use crate::mock_server::state::MockState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(body): Json<LoginBody>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    match state.login(&body.username, &body.password) {
        Some(token) => {
            (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}
