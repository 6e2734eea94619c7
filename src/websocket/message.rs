use serde::{Deserialize, Serialize};

use crate::deck::WordEntry;
use crate::round::result_log::ResultEntry;
use crate::round::round_fsm::RoundFsmState;
use crate::round::RoundSnapshot;

#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageIn {
    #[serde(rename_all = "camelCase")]
    StartRound {
        category: String,
        duration_seconds: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    StartCustomRound {
        words: Vec<WordEntry>,
        duration_seconds: Option<u32>,
    },
    Primary,
    Secondary,
    MarkCorrect,
    MarkSkip,
    GoHome,
    Restart,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WsMessageOut {
    Round(RoundDto),
    Error {
        r#type: String,
        title: String,
        detail: String,
    },
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    pub stage: String,
    pub label: Option<String>,
    pub word: Option<WordDto>,
    pub image: Option<String>,
    pub current_index: usize,
    pub deck_size: usize,
    pub countdown: u32,
    pub seconds_remaining: u32,
    pub correct_count: usize,
    pub skip_count: usize,
    pub results: Vec<ResultDto>,
    pub awaiting_secondary: bool,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordDto {
    pub primary: String,
    pub secondary: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultDto {
    pub word: WordDto,
    pub correct: bool,
}

impl From<&WordEntry> for WordDto {
    fn from(word: &WordEntry) -> Self {
        WordDto {
            primary: word.primary().to_string(),
            secondary: word.secondary().map(|secondary| secondary.to_string()),
        }
    }
}

impl From<&ResultEntry> for ResultDto {
    fn from(entry: &ResultEntry) -> Self {
        ResultDto {
            word: (&entry.word).into(),
            correct: entry.correct,
        }
    }
}

impl From<RoundSnapshot> for RoundDto {
    fn from(snapshot: RoundSnapshot) -> Self {
        RoundDto {
            stage: stage_to_string(snapshot.stage),
            label: snapshot.label,
            word: snapshot.current_word.as_ref().map(WordDto::from),
            image: snapshot.current_image,
            current_index: snapshot.current_index,
            deck_size: snapshot.deck_len,
            countdown: snapshot.countdown_remaining,
            seconds_remaining: snapshot.seconds_remaining,
            correct_count: snapshot.correct_count,
            skip_count: snapshot.skip_count,
            results: snapshot.results.iter().map(ResultDto::from).collect(),
            awaiting_secondary: snapshot.awaiting_secondary,
        }
    }
}

pub fn stage_to_string(stage: RoundFsmState) -> String {
    match stage {
        RoundFsmState::Home => "Home",
        RoundFsmState::Countdown => "Countdown",
        RoundFsmState::Active => "Active",
        RoundFsmState::Ended => "Ended",
    }
    .to_string()
}
