//! Package and upload endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{detail, paged, unauthorized, PageQuery};
use crate::mock_server::state::{MockState, UploadedFile};
use crate::sha256_hex;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub force: bool,
    pub sha256: String,
}

/// GET /api/channels/{channel}/packages
pub async fn list_packages(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(channel): Path<String>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    match state.list_packages(&channel) {
        Some(packages) => paged(packages, &query),
        None => detail(StatusCode::NOT_FOUND, format!("Channel {channel} not found")),
    }
}

/// POST /api/channels/{channel}/upload/{filename}?force=...&sha256=...
pub async fn upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path((channel, filename)): Path<(String, String)>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut content = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("files") => match field.bytes().await {
                Ok(bytes) => content = Some(bytes),
                Err(e) => return detail(StatusCode::BAD_REQUEST, e.to_string()),
            },
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => return detail(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    let Some(content) = content else {
        return detail(StatusCode::BAD_REQUEST, "missing 'files' part");
    };

    if sha256_hex(&content) != query.sha256 {
        return detail(StatusCode::BAD_REQUEST, "Wrong SHA256 checksum");
    }

    let mut state = state.write().await;
    if !state.is_authorized(&headers) {
        return unauthorized();
    }

    if !state.channels.contains_key(&channel) {
        return detail(StatusCode::NOT_FOUND, format!("Channel {channel} not found"));
    }
    if !query.force && state.has_upload(&channel, &filename) {
        return detail(
            StatusCode::CONFLICT,
            format!("{filename} already exists in {channel}"),
        );
    }

    state.record_upload(UploadedFile {
        channel,
        filename,
        sha256: query.sha256,
        size: content.len(),
        force: query.force,
    });
    StatusCode::CREATED.into_response()
}
