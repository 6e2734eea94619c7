pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::domain_error::DomainError;
use crate::error::Error;

use self::message::{WsMessageIn, WsMessageOut};

pub async fn send_error_and_close(mut websocket: WebSocket, error: &Error) {
    // We are closing the websocket, ignore if there's any error sending the last message
    send_error(&mut websocket, error).await;
    close(websocket).await;
}

pub async fn send_error(websocket: &mut WebSocket, error: &Error) {
    if let Err(failure) = send_message(websocket, &error_to_ws_error(error)).await {
        log::debug!("Could not send an error to the screen. Error: '{error}', SendError: '{failure}'.");
    }
}

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::debug!("Could not close the WebSocket. Error: '{error}'.")
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;

    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, message: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(message.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

pub fn error_to_ws_error(error: &Error) -> WsMessageOut {
    let (r#type, title) = match error {
        Error::Domain(DomainError::InvalidConfig(_)) => {
            ("INVALID_CONFIG", "The round cannot start with this configuration")
        }
        Error::Domain(DomainError::InvalidStageForStart(_)) => {
            ("INVALID_STAGE_FOR_START", "A round is already in progress")
        }
        Error::Domain(DomainError::InvalidStageForRestart(_)) => {
            ("INVALID_STAGE_FOR_RESTART", "The round has not ended yet")
        }
        Error::Domain(DomainError::SessionDoesNotExist(_)) => {
            ("SESSION_DOES_NOT_EXIST", "The session does not exist")
        }
        Error::Domain(DomainError::ScreenAlreadyConnected(_)) => (
            "SCREEN_ALREADY_CONNECTED",
            "Another screen is already showing this session",
        ),
        Error::Domain(DomainError::InvalidDeck(_)) => ("INVALID_DECK", "The deck is invalid"),
        Error::Internal(_) => ("INTERNAL_SERVER", "Internal Server error"),
        Error::PersistenceFailure(_) => ("PERSISTENCE_FAILURE", "Could not save, try again later"),
        Error::StaleEventDropped(_) => ("STALE_EVENT", "The action came too late"),
        Error::UnprocessableMessage(_, _) => {
            ("UNPROCESSABLE_MESSAGE", "The message could not be processed")
        }
        Error::WebsocketClosed(_) => ("WEBSOCKET_CLOSED", "The screen websocket is closed"),
    };

    WsMessageOut::Error {
        r#type: r#type.to_string(),
        title: title.to_string(),
        detail: error.to_string(),
    }
}
