use crate::detector::DetectorError;
use crate::page::{render_index, PageContext};
use crate::server::SharedState;
use axum::{
    extract::{multipart::Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("No file submitted")]
    NoFile,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Detection(String),
    #[error("Error processing image: {0}")]
    Unexpected(String),
}

impl From<DetectorError> for PredictError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::Transport(_) => PredictError::Transport(err.to_string()),
            DetectorError::Detection(message) => PredictError::Detection(message),
            DetectorError::InvalidResponse(_) => PredictError::Unexpected(err.to_string()),
        }
    }
}

/// Every failure ends as a rendered page; nothing propagates past the
/// handler boundary.
impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        match self {
            PredictError::NoFile => Redirect::to("/").into_response(),
            other => {
                tracing::error!("prediction request failed: {}", other);
                Html(render_index(&PageContext::with_error(other.to_string()))).into_response()
            }
        }
    }
}

#[instrument(skip(state, multipart))]
pub async fn predict(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Response, PredictError> {
    let (filename, image_bytes) = read_image_field(multipart)
        .await?
        .ok_or(PredictError::NoFile)?;

    let stored = state
        .store
        .save_upload(&filename, &image_bytes)
        .await
        .map_err(|err| PredictError::Unexpected(err.to_string()))?;
    tracing::debug!(key = %stored.key, bytes = image_bytes.len(), "upload saved");

    let reply = state.detector.detect(image_bytes.clone()).await?;

    let decoded = image::load_from_memory(&image_bytes)
        .map_err(|err| PredictError::Unexpected(err.to_string()))?;

    let annotator = state.annotator.clone();
    let store = state.store.clone();
    let key = stored.key.clone();
    let detections = reply.detections.clone();
    tokio::task::spawn_blocking(move || {
        let mut image = decoded.to_rgb8();
        annotator.annotate(&mut image, &detections);
        store.save_result(&key, &image)
    })
    .await
    .map_err(|err| PredictError::Unexpected(err.to_string()))?
    .map_err(|err| PredictError::Unexpected(err.to_string()))?;

    tracing::info!(key = %stored.key, count = reply.count, "annotated image written");

    let context = PageContext::success(stored.upload_url(), stored.result_url(), reply.count);
    Ok(Html(render_index(&context)).into_response())
}

/// Pulls the `image` file out of the form. `Ok(None)` means no usable file
/// was submitted, which maps to a redirect rather than an error page.
async fn read_image_field(
    mut multipart: Multipart,
) -> Result<Option<(String, Bytes)>, PredictError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| PredictError::Unexpected(err.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| PredictError::Unexpected(err.to_string()))?;
        return Ok(Some((filename, bytes)));
    }
    Ok(None)
}
