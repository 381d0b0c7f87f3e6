mod health;
mod index;
mod predict;
mod static_files;

use crate::server::SharedState;
use axum::routing::{get, post};
use axum::Router;

pub use predict::PredictError;

pub fn app_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(index::index))
        .route("/predict", post(predict::predict))
        .route("/static/uploads/{file}", get(static_files::serve_upload))
        .route("/static/results/{file}", get(static_files::serve_result))
        .route("/health", get(health::healthcheck))
}
