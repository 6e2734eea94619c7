use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::routes::AppState;

#[derive(Serialize)]
pub struct CategoryDto {
    name: String,
    words: usize,
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryDto>> {
    Json(
        state
            .categories
            .categories()
            .iter()
            .map(|category| CategoryDto {
                name: category.name.clone(),
                words: category.words.len(),
            })
            .collect(),
    )
}
