use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;
use vigia_core::Article;

use crate::AppState;

pub async fn list_articles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_articles().await {
        Ok(articles) => Json::<Vec<Article>>(articles).into_response(),
        Err(e) => {
            error!("failed to list articles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to list articles",
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}
