use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::deck::category::CategorySource;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session_factory::actor_client::SessionFactoryClient;
use crate::store::{DeckStore, UsageStore};
use crate::websocket::error_to_ws_error;

mod admin;
mod category;
mod deck;
mod health;
mod metrics;
mod session;

pub struct AppState {
    pub session_factory: SessionFactoryClient,
    pub categories: Arc<CategorySource>,
    pub usage: Arc<dyn UsageStore>,
    pub decks: Arc<dyn DeckStore>,
    pub default_duration_seconds: u32,
}

pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::get))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/categories", get(category::list))
        .route("/session", post(session::create))
        .route(
            "/session/:session_id/ws",
            get(session::connect_screen_to_websocket),
        )
        .route("/decks", post(deck::save))
        .route("/admin/leaderboard", get(admin::leaderboard))
        .layer(if config.allow_cors {
            log::info!("CorsLayer Permissive");
            CorsLayer::permissive()
        } else {
            CorsLayer::default()
        })
}

fn error_response(error: Error) -> Response {
    let status = match &error {
        Error::Domain(DomainError::SessionDoesNotExist(_)) => StatusCode::NOT_FOUND,
        Error::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::UnprocessableMessage(_, _) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::PersistenceFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::StaleEventDropped(_) => StatusCode::CONFLICT,
        Error::Internal(_) | Error::WebsocketClosed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error_to_ws_error(&error))).into_response()
}
