//! Channel endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{detail, paged, unauthorized, PageQuery};
use crate::mock_server::fixtures::Fixtures;
use crate::mock_server::state::MockState;

#[derive(Debug, Deserialize)]
pub struct NewChannelBody {
    pub name: String,
}

/// GET /api/channels
pub async fn list_channels(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    let channels: Vec<_> = state.channels.values().cloned().collect();
    paged(channels, &query)
}

/// GET /api/channels/{channel}
pub async fn get_channel(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.channels.get(&name) {
        Some(channel) => (StatusCode::OK, Json(channel.clone())).into_response(),
        None => detail(StatusCode::NOT_FOUND, format!("Channel {name} not found")),
    }
}

/// POST /api/channels
pub async fn create_channel(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Json(body): Json<NewChannelBody>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if state.channels.contains_key(&body.name) {
        return detail(
            StatusCode::CONFLICT,
            format!("Channel {} exists", body.name),
        );
    }

    state
        .channels
        .insert(body.name.clone(), Fixtures::channel(&body.name));
    StatusCode::CREATED.into_response()
}

/// DELETE /api/channels/{channel}
pub async fn delete_channel(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if state.delete_channel(&name) {
        StatusCode::OK.into_response()
    } else {
        detail(StatusCode::NOT_FOUND, format!("Channel {name} not found"))
    }
}
