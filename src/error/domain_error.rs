use thiserror::Error;

use crate::round::round_fsm::RoundFsmState;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("The round configuration is invalid. Reason: '{0}'.")]
    InvalidConfig(String),
    #[error("A round can only be started from Home. ActualStage: '{0}'.")]
    InvalidStageForStart(RoundFsmState),
    #[error("A round can only be restarted once it has ended. ActualStage: '{0}'.")]
    InvalidStageForRestart(RoundFsmState),
    #[error("The session does not exist. SessionId: '{0}'.")]
    SessionDoesNotExist(String),
    #[error("A screen is already connected to the session. SessionId: '{0}'.")]
    ScreenAlreadyConnected(String),
    #[error("The custom deck is invalid. Reason: '{0}'.")]
    InvalidDeck(String),
}
