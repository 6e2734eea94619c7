use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::deck::WordEntry;
use crate::routes::{error_response, AppState};
use crate::store::{DeckId, DeckMeta};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDeckRequest {
    id: Option<DeckId>,
    words: Vec<WordEntry>,
    #[serde(flatten)]
    meta: DeckMeta,
}

#[derive(Serialize)]
pub struct SaveDeckResponse {
    id: DeckId,
}

pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveDeckRequest>,
) -> Response {
    match state
        .decks
        .save_deck(request.id, request.words, request.meta)
        .await
    {
        Ok(id) => (StatusCode::OK, Json(SaveDeckResponse { id })).into_response(),
        Err(error) => {
            log::warn!("Custom deck not saved. Error: '{error}'.");
            error_response(error)
        }
    }
}
