use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::routes::{error_response, AppState};
use crate::screen::actor::ScreenActor;
use crate::websocket::send_error_and_close;

#[derive(Serialize)]
pub struct CreateSessionResponse {
    id: String,
}

pub async fn create(State(state): State<Arc<AppState>>) -> Response {
    match state.session_factory.create_session().await {
        Ok(id) => (StatusCode::OK, Json(CreateSessionResponse { id })).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn connect_screen_to_websocket(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| async move {
        match state.session_factory.get_session(&session_id).await {
            Ok(round) => {
                ScreenActor::create(
                    session_id,
                    round,
                    state.default_duration_seconds,
                    websocket,
                )
                .await
            }
            Err(error) => send_error_and_close(websocket, &error).await,
        }
    })
}
