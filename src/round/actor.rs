use std::fmt::{Display, Formatter};
use std::time::Duration;

use tokio::select;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast,
    mpsc::{self, Receiver, Sender, UnboundedReceiver},
};
use tokio::time::{self, Instant};

use crate::config::{RoundSettings, SessionSettings};
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::metrics::{ACTIVE_SESSIONS, STALE_EVENTS_DROPPED};
use crate::round::actor_client::RoundClient;
use crate::round::input::Activation;
use crate::round::{Round, RoundConfig, RoundEvent, RoundServices, RoundSnapshot};
use crate::session_factory::actor_client::SessionFactoryClient;

/// Owns the round of one session. Commands from the screen and events fired by the
/// round's own timer and hold-off window are handled one at a time, and every change
/// is broadcast as a snapshot.
pub struct RoundActor {
    session_id: String,
    round: Round,
    commands_rx: Receiver<RoundCommand>,
    events_rx: UnboundedReceiver<RoundEvent>,
    broadcast_tx: broadcast::Sender<RoundSnapshot>,
    session_factory: SessionFactoryClient,
    inactivity_timeout: Duration,
    screen_connected: bool,
}

impl RoundActor {
    pub fn spawn(
        session_id: &str,
        round_settings: RoundSettings,
        session_settings: SessionSettings,
        services: RoundServices,
        session_factory: SessionFactoryClient,
    ) -> RoundClient {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let round = Round::new(round_settings, services, events_tx);
        let (commands_tx, commands_rx): (Sender<RoundCommand>, Receiver<RoundCommand>) =
            mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<RoundSnapshot>,
            broadcast::Receiver<RoundSnapshot>,
        ) = broadcast::channel(32);

        tokio::spawn(
            RoundActor {
                session_id: session_id.to_string(),
                round,
                commands_rx,
                events_rx,
                broadcast_tx,
                session_factory,
                inactivity_timeout: session_settings.inactivity_timeout(),
                screen_connected: false,
            }
            .start(),
        );

        RoundClient { commands_tx }
    }

    async fn start(mut self) {
        ACTIVE_SESSIONS.inc();
        let mut deadline = Instant::now() + self.inactivity_timeout;

        loop {
            select! {
                command = self.commands_rx.recv() => match command {
                    Some(command) => {
                        deadline = Instant::now() + self.inactivity_timeout;
                        self.handle_command(command);
                    }
                    None => {
                        log::info!("Round channel has been dropped. Stopping round actor. SessionId: '{}'.", self.session_id);
                        break;
                    }
                },
                Some(event) = self.events_rx.recv() => {
                    match self.round.handle_event(event) {
                        Ok(()) => self.send_snapshot(),
                        Err(error) => self.log_rejected_event(&error),
                    }
                },
                _ = time::sleep_until(deadline) => {
                    if self.screen_connected {
                        deadline = Instant::now() + self.inactivity_timeout;
                    } else {
                        log::info!(
                            "No activity detected in session {} after {} seconds. Stopping round actor.",
                            self.session_id, self.inactivity_timeout.as_secs()
                        );
                        break;
                    }
                },
            }
        }

        self.stop_session().await;
        ACTIVE_SESSIONS.dec();
    }

    fn handle_command(&mut self, command: RoundCommand) {
        let changes_round = command.changes_round();
        let (result, response_tx) = match command {
            RoundCommand::ConnectScreen { response_tx } => {
                let result = if self.screen_connected {
                    Err(Error::Domain(DomainError::ScreenAlreadyConnected(
                        self.session_id.clone(),
                    )))
                } else {
                    self.screen_connected = true;
                    Ok(RoundResponse::ScreenConnected {
                        snapshot: self.round.snapshot(),
                        broadcast_rx: self.broadcast_tx.subscribe(),
                    })
                };
                (result, response_tx)
            }
            RoundCommand::DisconnectScreen => {
                // The round keeps going; a reconnecting screen picks it up again
                self.screen_connected = false;
                return;
            }
            RoundCommand::StartRound {
                config,
                response_tx,
            } => (self.round.start(config).map(|_| RoundResponse::Ok), response_tx),
            RoundCommand::Activate {
                activation,
                response_tx,
            } => (
                self.round.activate(activation).map(|_| RoundResponse::Ok),
                response_tx,
            ),
            RoundCommand::GoHome { response_tx } => {
                (self.round.go_home().map(|_| RoundResponse::Ok), response_tx)
            }
            RoundCommand::Restart { response_tx } => {
                (self.round.restart().map(|_| RoundResponse::Ok), response_tx)
            }
            RoundCommand::GetSnapshot { response_tx } => (
                Ok(RoundResponse::Snapshot {
                    snapshot: self.round.snapshot(),
                }),
                response_tx,
            ),
        };

        let changed = changes_round && result.is_ok();
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                self.log_rejected_event(&error);
                RoundResponse::Error { error }
            }
        };
        if let Err(response) = response_tx.send(response) {
            log::error!("Sent RoundResponse to the screen but the response channel is closed. SessionId: '{}', RoundResponse: '{response}'.", self.session_id);
        }
        if changed {
            self.send_snapshot();
        }
    }

    fn send_snapshot(&self) {
        // No receivers just means no screen is connected right now
        let _ = self.broadcast_tx.send(self.round.snapshot());
    }

    fn log_rejected_event(&self, error: &Error) {
        if error.is_stale() {
            STALE_EVENTS_DROPPED.inc();
            log::debug!("{error} SessionId: '{}'.", self.session_id);
        } else {
            log::warn!("Command rejected. SessionId: '{}', Error: '{error}'.", self.session_id);
        }
    }

    async fn stop_session(mut self) {
        if let Err(error) = self.round.go_home() {
            log::error!("Could not reset the round of a stopping session. SessionId: '{}', Error: '{error}'.", self.session_id);
        }
        if let Err(error) = self.session_factory.remove_session(&self.session_id).await {
            log::error!(
                "The SessionFactory channel is closed, can't remove the session. SessionId: '{}', Error: '{error}'.",
                self.session_id
            );
        }
    }
}

pub(crate) enum RoundCommand {
    ConnectScreen {
        response_tx: OneshotSender<RoundResponse>,
    },
    DisconnectScreen,
    StartRound {
        config: RoundConfig,
        response_tx: OneshotSender<RoundResponse>,
    },
    Activate {
        activation: Activation,
        response_tx: OneshotSender<RoundResponse>,
    },
    GoHome {
        response_tx: OneshotSender<RoundResponse>,
    },
    Restart {
        response_tx: OneshotSender<RoundResponse>,
    },
    GetSnapshot {
        response_tx: OneshotSender<RoundResponse>,
    },
}

impl RoundCommand {
    fn changes_round(&self) -> bool {
        matches!(
            self,
            RoundCommand::StartRound { .. }
                | RoundCommand::Activate { .. }
                | RoundCommand::GoHome { .. }
                | RoundCommand::Restart { .. }
        )
    }
}

#[derive(Debug)]
pub(crate) enum RoundResponse {
    ScreenConnected {
        snapshot: RoundSnapshot,
        broadcast_rx: broadcast::Receiver<RoundSnapshot>,
    },
    Snapshot {
        snapshot: RoundSnapshot,
    },
    Ok,
    Error {
        error: Error,
    },
}

impl Display for RoundResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundResponse::ScreenConnected { .. } => write!(formatter, "RoundResponse::ScreenConnected"),
            RoundResponse::Snapshot { snapshot } => {
                write!(formatter, "RoundResponse::Snapshot({})", snapshot.stage)
            }
            RoundResponse::Ok => write!(formatter, "RoundResponse::Ok"),
            RoundResponse::Error { error } => write!(formatter, "Error '{error}'"),
        }
    }
}
