use crate::page::{render_index, PageContext};
use axum::response::Html;

pub async fn index() -> Html<String> {
    Html(render_index(&PageContext::default()))
}
