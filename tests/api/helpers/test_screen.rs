use std::time::Duration;

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub struct TestScreen {
    pub tx: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
    pub rx: SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageOut {
    #[serde(rename_all = "camelCase")]
    StartRound {
        category: String,
        duration_seconds: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    StartCustomRound {
        words: Vec<Value>,
        duration_seconds: Option<u32>,
    },
    Primary,
    Secondary,
    MarkCorrect,
    MarkSkip,
    GoHome,
    Restart,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageIn {
    Round(RoundState),
    Error {
        r#type: String,
        title: String,
        detail: String,
    },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub stage: String,
    pub label: Option<String>,
    pub word: Option<Word>,
    pub image: Option<String>,
    pub current_index: usize,
    pub deck_size: usize,
    pub countdown: u32,
    pub seconds_remaining: u32,
    pub correct_count: usize,
    pub skip_count: usize,
    pub results: Vec<ResultEntry>,
    pub awaiting_secondary: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Word {
    pub primary: String,
    pub secondary: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub word: Word,
    pub correct: bool,
}

impl TestScreen {
    /// The next round message, or the type of the error message received instead.
    pub async fn receive_round(&mut self) -> Result<RoundState, String> {
        match time::timeout(Duration::from_secs(5), self.rx.next()).await {
            Ok(Some(Ok(message))) => {
                let text = message.to_text().expect("Message was not a text");
                match serde_json::from_str(text) {
                    Ok(WsMessageIn::Round(round)) => Ok(round),
                    Ok(WsMessageIn::Error {
                        r#type,
                        title,
                        detail,
                    }) => {
                        assert!(!title.is_empty());
                        assert!(!detail.is_empty());
                        Err(r#type)
                    }
                    Err(error) => Err(format!(
                        "Could not parse the message. Message: '{text}', Error: '{error}'."
                    )),
                }
            }
            Ok(Some(Err(error))) => Err(format!("Websocket returned an error {error}")),
            Ok(None) => Err("Websocket closed before expected.".to_string()),
            Err(_) => Err("No message received in time.".to_string()),
        }
    }

    pub async fn receive_text(&mut self) -> String {
        match time::timeout(Duration::from_secs(5), self.rx.next()).await {
            Ok(Some(Ok(message))) => message
                .into_text()
                .expect("Message was not a text"),
            _ => panic!("No message received in time."),
        }
    }

    /// Skips round messages until one satisfies `done`. Errors are returned right away.
    pub async fn receive_round_until(
        &mut self,
        done: impl Fn(&RoundState) -> bool,
    ) -> Result<RoundState, String> {
        loop {
            let round = self.receive_round().await?;
            if done(&round) {
                return Ok(round);
            }
        }
    }

    /// Skips round messages until an error arrives and returns its type.
    pub async fn receive_error(&mut self) -> String {
        loop {
            if let Err(error) = self.receive_round().await {
                return error;
            }
        }
    }

    pub async fn start_round(&mut self, category: &str, duration_seconds: u32) {
        self.send_text_message(WsMessageOut::StartRound {
            category: category.to_string(),
            duration_seconds: Some(duration_seconds),
        })
        .await;
    }

    pub async fn start_custom_round(&mut self, words: &[&str], duration_seconds: u32) {
        self.send_text_message(WsMessageOut::StartCustomRound {
            words: words.iter().map(|word| Value::from(*word)).collect(),
            duration_seconds: Some(duration_seconds),
        })
        .await;
    }

    pub async fn send(&mut self, message: WsMessageOut) {
        self.send_text_message(message).await;
    }

    pub async fn send_message(&mut self, message: Message) {
        self.tx.send(message).await.expect("Could not send message");
    }

    async fn send_text_message(&mut self, message: WsMessageOut) {
        self.send_message(Message::Text(
            serde_json::to_string(&message).expect("Could not serialize message"),
        ))
        .await;
    }
}
