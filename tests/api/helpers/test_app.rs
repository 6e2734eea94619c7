use std::{net::SocketAddr, time::Duration};

use futures_util::StreamExt;
use headsup::config::Config;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tokio::net::TcpListener;

use super::test_screen::TestScreen;

// Set TEST_LOG to see the server logs while running the tests
static LOGGER: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        std_logger::Config::logfmt().init();
    }
});

pub struct TestApp {
    pub base_address: String,
    pub inactivity_timeout: Duration,
}

#[derive(Deserialize)]
pub struct SessionCreatedResponse {
    pub id: String,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        TestApp::spawn_app_with_store(None).await
    }

    /// Spawns the app with its documents written to `store_path`.
    pub async fn spawn_app_with_store(store_path: Option<String>) -> TestApp {
        Lazy::force(&LOGGER);

        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to bind random port.");
        let address = listener.local_addr().unwrap();
        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.round.countdown_seconds = 0;
            config.session.inactivity_timeout_seconds = 1;
            config.store.path = store_path;
            config.image.enabled = false;
            config
        };

        let server = headsup::startup::create_web_server(config.clone(), listener);
        let _ = tokio::spawn(server);

        TestApp {
            base_address: format!("localhost:{}", address.port()),
            inactivity_timeout: config.session.inactivity_timeout(),
        }
    }

    pub async fn create_session(&self) -> String {
        let response = reqwest::Client::new()
            .post(format!("http://{}/session", self.base_address))
            .send()
            .await
            .expect("Failed to execute CreateSession request.");
        assert!(response.status().is_success());

        let session_created_response: SessionCreatedResponse = response
            .json()
            .await
            .expect("Failed to parse SessionCreatedResponse.");
        assert!(!session_created_response.id.is_empty());
        session_created_response.id
    }

    pub async fn open_screen(&self, session_id: &str) -> Result<TestScreen, String> {
        let (websocket_stream, _) = tokio_tungstenite::connect_async(format!(
            "ws://{}/session/{session_id}/ws",
            self.base_address
        ))
        .await
        .map_err(|error| format!("WebSocket could not be created. Error: '{error}'."))?;
        let (tx, rx) = websocket_stream.split();
        Ok(TestScreen { tx, rx })
    }

    /// Spawns the app, creates a session and connects its screen, which starts at Home.
    pub async fn spawn_app_with_screen() -> (TestApp, TestScreen) {
        let app = TestApp::spawn_app().await;
        let session_id = app.create_session().await;
        let mut screen = app.open_screen(&session_id).await.unwrap();
        let round = screen.receive_round().await.unwrap();
        assert_eq!(round.stage, "Home");
        (app, screen)
    }
}
