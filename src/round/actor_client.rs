use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, error::RecvError as OneshotRecvError, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::round::actor::{RoundCommand, RoundResponse};
use crate::round::input::Activation;
use crate::round::{RoundConfig, RoundSnapshot};

#[derive(Clone, Debug)]
pub struct RoundClient {
    pub(crate) commands_tx: Sender<RoundCommand>,
}

impl RoundClient {
    /// Claims the session's screen, returning the current snapshot and a receiver of the
    /// following ones.
    pub async fn connect_screen(&self) -> Result<(RoundSnapshot, SnapshotReceiver), Error> {
        let (tx, rx) = RoundClient::response_channel();

        self.commands_tx
            .send(RoundCommand::ConnectScreen { response_tx: tx })
            .await
            // The session is still listed in the SessionFactory but its actor already stopped
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "The round is not alive. Can't connect the screen. Error: '{error}'"
                ))
            })?;

        match rx.await {
            Ok(RoundResponse::ScreenConnected {
                snapshot,
                broadcast_rx,
            }) => Ok((snapshot, SnapshotReceiver { broadcast_rx })),
            response => Err(RoundClient::handle_response_error(response)),
        }
    }

    pub async fn disconnect_screen(&self) -> Result<(), Error> {
        self.send_command(RoundCommand::DisconnectScreen, "RoundCommand::DisconnectScreen")
            .await
    }

    pub async fn start_round(&self, config: RoundConfig) -> Result<(), Error> {
        let (tx, rx) = RoundClient::response_channel();
        self.send_command(
            RoundCommand::StartRound {
                config,
                response_tx: tx,
            },
            "RoundCommand::StartRound",
        )
        .await?;
        RoundClient::expect_ok(rx.await)
    }

    pub async fn activate(&self, activation: Activation) -> Result<(), Error> {
        let (tx, rx) = RoundClient::response_channel();
        self.send_command(
            RoundCommand::Activate {
                activation,
                response_tx: tx,
            },
            "RoundCommand::Activate",
        )
        .await?;
        RoundClient::expect_ok(rx.await)
    }

    pub async fn go_home(&self) -> Result<(), Error> {
        let (tx, rx) = RoundClient::response_channel();
        self.send_command(RoundCommand::GoHome { response_tx: tx }, "RoundCommand::GoHome")
            .await?;
        RoundClient::expect_ok(rx.await)
    }

    pub async fn restart(&self) -> Result<(), Error> {
        let (tx, rx) = RoundClient::response_channel();
        self.send_command(RoundCommand::Restart { response_tx: tx }, "RoundCommand::Restart")
            .await?;
        RoundClient::expect_ok(rx.await)
    }

    pub async fn snapshot(&self) -> Result<RoundSnapshot, Error> {
        let (tx, rx) = RoundClient::response_channel();
        self.send_command(
            RoundCommand::GetSnapshot { response_tx: tx },
            "RoundCommand::GetSnapshot",
        )
        .await?;
        match rx.await {
            Ok(RoundResponse::Snapshot { snapshot }) => Ok(snapshot),
            response => Err(RoundClient::handle_response_error(response)),
        }
    }

    fn response_channel() -> (OneshotSender<RoundResponse>, OneshotReceiver<RoundResponse>) {
        oneshot::channel()
    }

    async fn send_command(&self, command: RoundCommand, command_name: &str) -> Result<(), Error> {
        self.commands_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Tried to send {command_name} but RoundActor is not listening. Error: {error}."
            ))
        })
    }

    fn expect_ok(response: Result<RoundResponse, OneshotRecvError>) -> Result<(), Error> {
        match response {
            Ok(RoundResponse::Ok) => Ok(()),
            response => Err(RoundClient::handle_response_error(response)),
        }
    }

    fn handle_response_error(response: Result<RoundResponse, OneshotRecvError>) -> Error {
        match response {
            Ok(RoundResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected RoundResponse. RoundResponse: '{unexpected_response}'."
            )),
            Err(_) => Error::log_and_create_internal(
                "Sent a command to the RoundActor, but the actor channel died.",
            ),
        }
    }
}

pub struct SnapshotReceiver {
    broadcast_rx: broadcast::Receiver<RoundSnapshot>,
}

impl SnapshotReceiver {
    /// The next snapshot. A screen too slow to keep up skips straight to the newest ones.
    pub async fn next(&mut self) -> Result<RoundSnapshot, Error> {
        loop {
            match self.broadcast_rx.recv().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("Screen lagged behind the round. SkippedSnapshots: '{skipped}'.");
                }
                Err(error @ RecvError::Closed) => {
                    return Err(Error::log_and_create_internal(&format!(
                        "The broadcast channel with the round has been closed. Error: {error}."
                    )))
                }
            }
        }
    }
}
