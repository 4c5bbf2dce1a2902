//! HTTP request handlers for the mock server.

pub mod auth;
pub mod channels;
pub mod members;
pub mod packages;
pub mod users;

pub use auth::*;
pub use channels::*;
pub use members::*;
pub use packages::*;
pub use users::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

/// Pagination query shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Slice `items` and wrap them in the list envelope.
pub(crate) fn paged<T: Serialize>(items: Vec<T>, query: &PageQuery) -> Response {
    let count = items.len() as u64;
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    let result: Vec<T> = items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "result": result,
            "count": count,
            "skip": skip,
            "limit": limit,
        })),
    )
        .into_response()
}

/// FastAPI-style error body.
pub(crate) fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "detail": message.into() }))).into_response()
}

pub(crate) fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Not logged in")
}
