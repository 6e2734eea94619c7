pub mod domain_error;

use thiserror::Error;

use self::domain_error::DomainError;
use crate::round::input::WindowId;
use crate::round::round_fsm::RoundFsmState;
use crate::round::timer::TimerId;
use crate::round::RoundId;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("Domain Error. Error: '{0}'.")]
    Domain(DomainError),
    #[error("Internal Error. Error: '{0}'.")]
    Internal(String),
    #[error("Could not persist the document. Error: '{0}'.")]
    PersistenceFailure(String),
    #[error("Dropped a stale event. Reason: '{0}'.")]
    StaleEventDropped(StaleEvent),
    #[error("Received a bad formatted message. Message: '{1}', Error: '{0}'.")]
    UnprocessableMessage(String, String),
    #[error("The websocket with the screen is closed. Reason: '{0}'.")]
    WebsocketClosed(String),
}

impl Error {
    pub fn log_and_create_internal(message: &str) -> Error {
        log::error!("{message}");
        Error::Internal(message.to_string())
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleEventDropped(_))
    }
}

impl From<DomainError> for Error {
    fn from(error: DomainError) -> Self {
        Error::Domain(error)
    }
}

/// Why an event did not apply to the current round.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StaleEvent {
    #[error("{event} is not accepted in stage {stage}")]
    WrongStage {
        event: &'static str,
        stage: RoundFsmState,
    },
    #[error("timer {0} is no longer the live timer")]
    UnknownTimer(TimerId),
    #[error("hold-off window {0} is no longer armed")]
    UnknownWindow(WindowId),
    #[error("secondary activation without an armed hold-off window")]
    UnarmedSecondary,
    #[error("primary activation while a hold-off window is already armed")]
    AlreadyArmed,
    #[error("event belongs to round {0}, which is over")]
    UnknownRound(RoundId),
}
