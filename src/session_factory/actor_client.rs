use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::round::actor_client::RoundClient;
use crate::session_factory::actor::{SessionFactoryCommand, SessionFactoryResponse};

#[derive(Clone)]
pub struct SessionFactoryClient {
    pub(super) session_factory_tx: Sender<SessionFactoryCommand>,
}

impl SessionFactoryClient {
    pub async fn create_session(&self) -> Result<String, Error> {
        let (tx, rx): (
            OneshotSender<SessionFactoryResponse>,
            OneshotReceiver<SessionFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionFactoryCommand::CreateSession {
                response_channel: tx,
            },
            "The SessionFactory is not alive. Can't create Session",
        )
        .await?;

        match rx.await {
            Ok(SessionFactoryResponse::SessionCreated { session_id }) => Ok(session_id),
            error => Err(SessionFactoryClient::handle_event_error(error)),
        }
    }

    pub async fn remove_session(&self, session_id: &str) -> Result<(), Error> {
        self.send_command(
            SessionFactoryCommand::RemoveSession {
                session_id: session_id.to_string(),
            },
            "The SessionFactory channel is closed",
        )
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<RoundClient, Error> {
        let (tx, rx): (
            OneshotSender<SessionFactoryResponse>,
            OneshotReceiver<SessionFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionFactoryCommand::GetSession {
                session_id: session_id.to_string(),
                response_channel: tx,
            },
            "The SessionFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(SessionFactoryResponse::Session { session }) => Ok(session),
            error => Err(SessionFactoryClient::handle_event_error(error)),
        }
    }

    async fn send_command(
        &self,
        command: SessionFactoryCommand,
        error_message: &str,
    ) -> Result<(), Error> {
        self.session_factory_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'"))
        })
    }

    fn handle_event_error(error: Result<SessionFactoryResponse, RecvError>) -> Error {
        match error {
            Ok(SessionFactoryResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected SessionFactoryResponse. SessionFactoryResponse: '{unexpected_response}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the SessionFactory actor, but the actor channel died.",
            ),
        }
    }
}
