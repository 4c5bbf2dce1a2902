//! User and role endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{detail, paged, unauthorized, PageQuery};
use crate::mock_server::state::MockState;
use crate::UserRole;

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let users: Vec<_> = state.users.values().cloned().collect();
    paged(users, &query)
}

/// GET /api/users/{username}/role
pub async fn get_role(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.roles.get(&username) {
        Some(role) => (StatusCode::OK, Json(UserRole { role: *role })).into_response(),
        None => detail(StatusCode::NOT_FOUND, format!("User {username} not found")),
    }
}

/// PUT /api/users/{username}/role
pub async fn set_role(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(body): Json<UserRole>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if !state.users.contains_key(&username) {
        return detail(StatusCode::NOT_FOUND, format!("User {username} not found"));
    }

    state.roles.insert(username, body.role);
    StatusCode::OK.into_response()
}
