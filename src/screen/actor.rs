use axum::extract::ws::{Message, WebSocket};
use std::time::Duration;
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::deck::WordEntry;
use crate::error::Error;
use crate::metrics::CONNECTED_SCREENS;
use crate::round::actor_client::{RoundClient, SnapshotReceiver};
use crate::round::input::Activation;
use crate::round::{RoundConfig, RoundSnapshot};
use crate::websocket::message::{RoundDto, WsMessageIn, WsMessageOut};
use crate::websocket::{close, parse_message, send_error, send_message, send_message_string};

/// Bridges the websocket of the shared screen and the round of its session.
pub struct ScreenActor {
    session_id: String,
    round: RoundClient,
    snapshots: SnapshotReceiver,
    websocket: WebSocket,
    inactivity_timeout: Duration,
    default_duration_seconds: u32,
}

impl ScreenActor {
    const PING_TIMEOUT: Duration = Duration::from_millis(2500);

    pub async fn create(
        session_id: String,
        round: RoundClient,
        default_duration_seconds: u32,
        mut websocket: WebSocket,
    ) {
        match round.connect_screen().await {
            Ok((snapshot, snapshots)) => {
                let mut screen = ScreenActor {
                    session_id,
                    round,
                    snapshots,
                    websocket,
                    inactivity_timeout: ScreenActor::PING_TIMEOUT,
                    default_duration_seconds,
                };
                match screen.send_snapshot(snapshot).await {
                    Ok(()) => screen.start().await,
                    Err(_) => {
                        let _ = screen.round.disconnect_screen().await;
                    }
                }
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    }

    async fn start(mut self) {
        CONNECTED_SCREENS.inc();
        log::info!("Screen connected. SessionId: '{}'.", self.session_id);

        loop {
            select! {
                snapshot = self.snapshots.next() => {
                    let result = match snapshot {
                        Ok(snapshot) => self.send_snapshot(snapshot).await,
                        Err(error) => Err(error),
                    };
                    if let Err(error) = result {
                        if self.report_error(error).await {
                            break;
                        }
                    }
                },
                websocket_message = timeout(self.inactivity_timeout, self.websocket.recv()) => {
                    if let Err(error) = self.receive_websocket_message(websocket_message).await {
                        if self.report_error(error).await {
                            break;
                        }
                    }
                },
            }
        }

        let _ = self.round.disconnect_screen().await;
        close(self.websocket).await;
        CONNECTED_SCREENS.dec();
    }

    /// Tells the screen what went wrong, unless the action was merely late. Returns
    /// whether the connection has to be closed.
    async fn report_error(&mut self, error: Error) -> bool {
        if error.is_stale() {
            return false;
        }
        send_error(&mut self.websocket, &error).await;
        ScreenActor::should_close_websocket(&error)
    }

    fn should_close_websocket(error: &Error) -> bool {
        match error {
            Error::Internal(_) => true,
            Error::WebsocketClosed(_) => true,
            Error::Domain(_) => false,
            Error::PersistenceFailure(_) => false,
            Error::StaleEventDropped(_) => false,
            Error::UnprocessableMessage(_, _) => false,
        }
    }

    async fn send_snapshot(&mut self, snapshot: RoundSnapshot) -> Result<(), Error> {
        send_message(
            &mut self.websocket,
            &WsMessageOut::Round(RoundDto::from(snapshot)),
        )
        .await
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Result<Option<Result<Message, axum::Error>>, Elapsed>,
    ) -> Result<(), Error> {
        match websocket_message {
            Ok(Some(Ok(Message::Text(txt)))) => match txt.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong").await,
                message => self.handle_message(parse_message(message)?).await,
            },
            // browser said "close"
            Ok(Some(Ok(Message::Close(_)))) => {
                self.log_connection_lost_with_screen("browser sent 'Close' websocket frame");
                Err(Error::WebsocketClosed(
                    "browser sent 'Close' websocket frame".to_string(),
                ))
            }
            // websocket was closed
            Ok(None) => {
                self.log_connection_lost_with_screen("other end of websocket was closed abruptly");
                Err(Error::WebsocketClosed(
                    "other end of websocket was closed abruptly".to_string(),
                ))
            }
            // timeout without receiving anything from the screen
            Err(_) => {
                self.log_connection_lost_with_screen(
                    "connection timed out; missing 'Ping' messages",
                );
                Err(Error::WebsocketClosed(
                    "connection timed out; missing 'Ping' messages".to_string(),
                ))
            }
            Ok(Some(Err(error))) => Err(Error::UnprocessableMessage(
                "Message cannot be loaded".to_string(),
                error.to_string(),
            )),
            Ok(Some(Ok(_))) => Err(Error::UnprocessableMessage(
                "Unsupported message type".to_string(),
                "Unsupported message type".to_string(),
            )),
        }
    }

    async fn handle_message(&mut self, message: WsMessageIn) -> Result<(), Error> {
        match message {
            WsMessageIn::StartRound {
                category,
                duration_seconds,
            } => {
                let duration_seconds = duration_seconds.unwrap_or(self.default_duration_seconds);
                self.round
                    .start_round(RoundConfig::category(&category, duration_seconds))
                    .await
            }
            WsMessageIn::StartCustomRound {
                words,
                duration_seconds,
            } => {
                let words = words.into_iter().filter_map(WordEntry::trimmed).collect();
                let duration_seconds = duration_seconds.unwrap_or(self.default_duration_seconds);
                self.round
                    .start_round(RoundConfig::custom(words, duration_seconds))
                    .await
            }
            WsMessageIn::Primary => self.round.activate(Activation::Primary).await,
            WsMessageIn::Secondary => self.round.activate(Activation::Secondary).await,
            WsMessageIn::MarkCorrect => self.round.activate(Activation::MarkCorrect).await,
            WsMessageIn::MarkSkip => self.round.activate(Activation::MarkSkip).await,
            WsMessageIn::GoHome => self.round.go_home().await,
            WsMessageIn::Restart => self.round.restart().await,
        }
    }

    fn log_connection_lost_with_screen(&self, reason: &str) {
        log::info!(
            "Connection with the screen of session {} lost due to: {}. Stopping screen actor.",
            &self.session_id,
            reason,
        );
    }
}
