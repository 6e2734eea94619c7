use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::routes::{error_response, AppState};

pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Response {
    match state.usage.leaderboard().await {
        Ok(leaderboard) => (StatusCode::OK, Json(leaderboard)).into_response(),
        Err(error) => error_response(error),
    }
}
