use std::fmt::{Display, Formatter};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot::Sender as OneshotSender;

use crate::error::Error;
use crate::round::actor_client::RoundClient;
use crate::session_factory::actor_client::SessionFactoryClient;
use crate::session_factory::{SessionFactory, SessionFactorySettings};

pub struct SessionFactoryActor {
    session_factory: SessionFactory,
    session_factory_rx: Receiver<SessionFactoryCommand>,
    session_factory_tx: Sender<SessionFactoryCommand>,
}

impl SessionFactoryActor {
    /// Runs the SessionFactory Actor in background and returns a Client to communicate with it
    pub fn spawn(settings: SessionFactorySettings) -> SessionFactoryClient {
        let session_factory = SessionFactory::new(settings);
        let (session_factory_tx, session_factory_rx): (
            Sender<SessionFactoryCommand>,
            Receiver<SessionFactoryCommand>,
        ) = mpsc::channel(512);

        tokio::spawn(
            SessionFactoryActor {
                session_factory,
                session_factory_rx,
                session_factory_tx: session_factory_tx.clone(),
            }
            .start(),
        );

        SessionFactoryClient { session_factory_tx }
    }

    async fn start(mut self) {
        while let Some(message) = self.session_factory_rx.recv().await {
            let response = match message {
                SessionFactoryCommand::CreateSession { response_channel } => {
                    let session_id =
                        self.session_factory
                            .create_new_session(SessionFactoryClient {
                                session_factory_tx: self.session_factory_tx.clone(),
                            });
                    Some((
                        Ok(SessionFactoryResponse::SessionCreated { session_id }),
                        response_channel,
                    ))
                }
                SessionFactoryCommand::RemoveSession { session_id } => {
                    let _ = self.session_factory.remove_session(&session_id);
                    None
                }
                SessionFactoryCommand::GetSession {
                    session_id,
                    response_channel,
                } => {
                    let result = self
                        .session_factory
                        .get_session(&session_id)
                        .map(|session| SessionFactoryResponse::Session {
                            session: session.clone(),
                        });
                    Some((result, response_channel))
                }
            };
            if let Some((result, response_tx)) = response {
                let event = match result {
                    Ok(event) => event,
                    Err(error) => SessionFactoryResponse::Error { error },
                };
                if let Err(error) = response_tx.send(event) {
                    log::error!("Sent SessionFactoryResponse but the response channel is closed. Error: '{error}'.");
                }
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum SessionFactoryCommand {
    CreateSession {
        response_channel: OneshotSender<SessionFactoryResponse>,
    },
    RemoveSession {
        session_id: String,
    },
    GetSession {
        session_id: String,
        response_channel: OneshotSender<SessionFactoryResponse>,
    },
}

#[derive(Debug)]
pub(crate) enum SessionFactoryResponse {
    SessionCreated { session_id: String },
    Session { session: RoundClient },
    Error { error: Error },
}

impl Display for SessionFactoryResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionFactoryResponse::SessionCreated { session_id } => {
                write!(formatter, "SessionCreated(session_id: {session_id})")
            }
            SessionFactoryResponse::Session { session: _ } => write!(formatter, "Session"),
            SessionFactoryResponse::Error { error } => write!(formatter, "Error '{error}'"),
        }
    }
}
