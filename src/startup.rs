use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::deck::category::CategorySource;
use crate::error::Error;
use crate::routes::{self, AppState};
use crate::round::RoundServices;
use crate::session_factory::actor::SessionFactoryActor;
use crate::session_factory::SessionFactorySettings;
use crate::store::DocumentStore;
use crate::image;

pub async fn create_web_server(config: Config, listener: TcpListener) -> Result<(), Error> {
    let categories = Arc::new(CategorySource::from_file(&config.data.categories_path)?);
    let store = Arc::new(match &config.store.path {
        Some(path) => DocumentStore::open(path).await?,
        None => {
            log::info!("No store path configured, documents are kept in memory.");
            DocumentStore::in_memory()
        }
    });
    let images = image::from_settings(&config.image)?;

    let session_factory = SessionFactoryActor::spawn(SessionFactorySettings {
        round: config.round.clone(),
        session: config.session.clone(),
        services: RoundServices {
            categories: Arc::clone(&categories),
            usage: store.clone(),
            images,
            image_categories: config.image.categories.clone(),
        },
    });

    let state = Arc::new(AppState {
        session_factory,
        categories,
        usage: store.clone(),
        decks: store,
        default_duration_seconds: config.round.default_duration_seconds,
    });
    let router = routes::create_router(&config).with_state(state);

    match listener.local_addr() {
        Ok(address) => log::info!("Listening on {address}"),
        Err(error) => log::warn!("Could not read the listening address. Error: '{error}'."),
    }
    axum::serve(listener, router).await.map_err(|error| {
        Error::log_and_create_internal(&format!("The web server stopped. Error: '{error}'."))
    })
}
