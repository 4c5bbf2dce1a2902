//! Channel member endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{detail, unauthorized};
use crate::mock_server::state::MockState;
use crate::Role;

#[derive(Debug, Deserialize)]
pub struct MemberBody {
    pub username: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct MemberQuery {
    pub username: String,
}

/// GET /api/channels/{channel}/members
///
/// Answers with a bare array; this route is not paginated.
pub async fn list_members(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(channel): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.list_members(&channel) {
        Some(members) => Json(members).into_response(),
        None => detail(StatusCode::NOT_FOUND, format!("Channel {channel} not found")),
    }
}

/// POST /api/channels/{channel}/members
pub async fn set_member(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(channel): Path<String>,
    Json(body): Json<MemberBody>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if !state.channels.contains_key(&channel) {
        return detail(StatusCode::NOT_FOUND, format!("Channel {channel} not found"));
    }
    if !state.users.contains_key(&body.username) {
        return detail(
            StatusCode::NOT_FOUND,
            format!("User {} not found", body.username),
        );
    }

    state.set_member(&channel, &body.username, body.role);
    StatusCode::CREATED.into_response()
}

/// DELETE /api/channels/{channel}/members?username=...
pub async fn delete_member(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(channel): Path<String>,
    Query(query): Query<MemberQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if state.remove_member(&channel, &query.username) {
        StatusCode::OK.into_response()
    } else {
        detail(
            StatusCode::NOT_FOUND,
            format!("{} is not a member of {channel}", query.username),
        )
    }
}
