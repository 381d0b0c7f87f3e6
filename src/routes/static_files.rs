use crate::server::SharedState;
use crate::storage::valid_key;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

pub async fn serve_upload(
    State(state): State<SharedState>,
    Path(file): Path<String>,
) -> Response {
    if !valid_key(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }
    serve_file(state.store.upload_file_path(&file)).await
}

pub async fn serve_result(
    State(state): State<SharedState>,
    Path(file): Path<String>,
) -> Response {
    if !valid_key(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }
    serve_file(state.store.result_file_path(&file)).await
}

async fn serve_file(path: PathBuf) -> Response {
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(&path))],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
