pub mod actor;
pub mod actor_client;
pub mod input;
pub mod result_log;
pub mod round_fsm;
pub mod timer;

use std::collections::HashMap;
use std::sync::Arc;

use rust_fsm::StateMachine;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::RoundSettings;
use crate::deck::category::CategorySource;
use crate::deck::{WordDeck, WordEntry};
use crate::error::domain_error::DomainError;
use crate::error::{Error, StaleEvent};
use crate::image::ImageLookup;
use crate::metrics::{ROUNDS_ENDED, ROUNDS_STARTED};
use crate::round::input::{Activation, InputDisambiguator, MarkEvent, WindowId};
use crate::round::result_log::{ResultEntry, ResultLog};
use crate::round::round_fsm::{RoundFsm, RoundFsmInput, RoundFsmState};
use crate::round::timer::{RoundTimer, TimerId};
use crate::store::UsageStore;

pub type RoundId = u64;

pub const CUSTOM_DECK_LABEL: &str = "custom";

#[derive(Clone, Debug, PartialEq)]
pub enum DeckSource {
    Category(String),
    Custom(Vec<WordEntry>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundConfig {
    pub deck: DeckSource,
    pub duration_seconds: u32,
}

impl RoundConfig {
    pub fn category(name: &str, duration_seconds: u32) -> Self {
        RoundConfig {
            deck: DeckSource::Category(name.to_string()),
            duration_seconds,
        }
    }

    pub fn custom(words: Vec<WordEntry>, duration_seconds: u32) -> Self {
        RoundConfig {
            deck: DeckSource::Custom(words),
            duration_seconds,
        }
    }

    pub fn label(&self) -> &str {
        match &self.deck {
            DeckSource::Category(name) => name,
            DeckSource::Custom(_) => CUSTOM_DECK_LABEL,
        }
    }
}

/// Events the round feeds back to itself from its timer, hold-off window and image lookups.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEvent {
    TimerTicked { timer_id: TimerId, remaining: u32 },
    TimerExpired { timer_id: TimerId },
    HoldOffElapsed { window_id: WindowId },
    ImageResolved {
        round_id: RoundId,
        index: usize,
        url: Option<String>,
    },
}

/// The collaborators a round needs beyond its own state.
#[derive(Clone)]
pub struct RoundServices {
    pub categories: Arc<CategorySource>,
    pub usage: Arc<dyn UsageStore>,
    pub images: Arc<dyn ImageLookup>,
    pub image_categories: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RoundState {
    /// Zero while at Home, a new id for every started round.
    pub id: RoundId,
    pub config: Option<RoundConfig>,
    pub deck: WordDeck,
    pub current_index: usize,
    pub countdown_remaining: u32,
    pub seconds_remaining: u32,
    pub correct_count: usize,
    pub skip_count: usize,
    pub result_log: ResultLog,
    pub images: HashMap<usize, String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundSnapshot {
    pub stage: RoundFsmState,
    pub label: Option<String>,
    pub current_word: Option<WordEntry>,
    pub current_image: Option<String>,
    pub current_index: usize,
    pub deck_len: usize,
    pub countdown_remaining: u32,
    pub seconds_remaining: u32,
    pub correct_count: usize,
    pub skip_count: usize,
    pub results: Vec<ResultEntry>,
    pub awaiting_secondary: bool,
}

/// One shared screen going Home -> Countdown -> Active -> Ended and back.
///
/// The round owns its countdown timer and hold-off window. Both report back through
/// `events_tx` and whoever owns the receiving end feeds those events to
/// `handle_event` one at a time, interleaved with the screen's calls. Every handler
/// checks the stage and the ids it was given, so an event that lost a race is
/// rejected with `Error::StaleEventDropped` and changes nothing.
pub struct Round {
    fsm: StateMachine<RoundFsm>,
    state: RoundState,
    settings: RoundSettings,
    services: RoundServices,
    timer: RoundTimer,
    disambiguator: InputDisambiguator,
    events_tx: UnboundedSender<RoundEvent>,
    next_round_id: RoundId,
    next_timer_id: TimerId,
}

impl Round {
    pub fn new(
        settings: RoundSettings,
        services: RoundServices,
        events_tx: UnboundedSender<RoundEvent>,
    ) -> Self {
        let window_tx = events_tx.clone();
        let disambiguator = InputDisambiguator::new(settings.hold_off(), move |window_id| {
            let _ = window_tx.send(RoundEvent::HoldOffElapsed { window_id });
        });

        Round {
            fsm: StateMachine::new(),
            state: RoundState::default(),
            settings,
            services,
            timer: RoundTimer::default(),
            disambiguator,
            events_tx,
            next_round_id: 0,
            next_timer_id: 0,
        }
    }

    pub fn stage(&self) -> RoundFsmState {
        *self.fsm.state()
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_awaiting_secondary(&self) -> bool {
        self.disambiguator.is_armed()
    }

    pub fn current_word(&self) -> Option<&WordEntry> {
        match self.stage() {
            RoundFsmState::Active => self.state.deck.get(self.state.current_index),
            RoundFsmState::Home | RoundFsmState::Countdown | RoundFsmState::Ended => None,
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            stage: self.stage(),
            label: self
                .state
                .config
                .as_ref()
                .map(|config| config.label().to_string()),
            current_word: self.current_word().cloned(),
            current_image: self
                .current_word()
                .and_then(|_| self.state.images.get(&self.state.current_index))
                .cloned(),
            current_index: self.state.current_index,
            deck_len: self.state.deck.len(),
            countdown_remaining: self.state.countdown_remaining,
            seconds_remaining: self.state.seconds_remaining,
            correct_count: self.state.correct_count,
            skip_count: self.state.skip_count,
            results: self.state.result_log.entries().to_vec(),
            awaiting_secondary: self.is_awaiting_secondary(),
        }
    }

    pub fn start(&mut self, config: RoundConfig) -> Result<(), Error> {
        self.validate(&config)?;
        if self.stage() != RoundFsmState::Home {
            return Err(Error::Domain(DomainError::InvalidStageForStart(
                self.stage(),
            )));
        }
        self.process_event(&RoundFsmInput::Start)?;

        self.next_round_id += 1;
        self.state = RoundState {
            id: self.next_round_id,
            countdown_remaining: self.settings.countdown_seconds,
            config: Some(config),
            ..RoundState::default()
        };
        log::info!(
            "Round countdown started. RoundId: '{}', Deck: '{}'.",
            self.state.id,
            self.label()
        );
        self.start_timer(self.settings.countdown_seconds);
        Ok(())
    }

    pub fn activate(&mut self, activation: Activation) -> Result<(), Error> {
        self.ensure_stage(RoundFsmState::Active, "Activation")?;
        match self
            .disambiguator
            .activate(activation)
            .map_err(Error::StaleEventDropped)?
        {
            Some(mark) => self.mark(mark),
            None => Ok(()),
        }
    }

    pub fn handle_event(&mut self, event: RoundEvent) -> Result<(), Error> {
        match event {
            RoundEvent::TimerTicked {
                timer_id,
                remaining,
            } => self.on_timer_ticked(timer_id, remaining),
            RoundEvent::TimerExpired { timer_id } => self.on_timer_expired(timer_id),
            RoundEvent::HoldOffElapsed { window_id } => {
                self.ensure_stage(RoundFsmState::Active, "HoldOffElapsed")?;
                let mark = self
                    .disambiguator
                    .window_elapsed(window_id)
                    .map_err(Error::StaleEventDropped)?;
                self.mark(mark)
            }
            RoundEvent::ImageResolved {
                round_id,
                index,
                url,
            } => self.on_image_resolved(round_id, index, url),
        }
    }

    pub fn restart(&mut self) -> Result<(), Error> {
        if self.stage() != RoundFsmState::Ended {
            return Err(Error::Domain(DomainError::InvalidStageForRestart(
                self.stage(),
            )));
        }
        self.process_event(&RoundFsmInput::Restart)?;
        self.reset();
        Ok(())
    }

    pub fn go_home(&mut self) -> Result<(), Error> {
        if self.stage() != RoundFsmState::Home {
            log::info!(
                "Round abandoned. RoundId: '{}', Stage: '{}'.",
                self.state.id,
                self.stage()
            );
        }
        self.process_event(&RoundFsmInput::GoHome)?;
        self.reset();
        Ok(())
    }

    fn validate(&self, config: &RoundConfig) -> Result<(), Error> {
        let reason = if config.duration_seconds == 0 {
            Some("The round duration must be greater than zero.".to_string())
        } else {
            match &config.deck {
                DeckSource::Category(name) if name.trim().is_empty() => {
                    Some("No category selected.".to_string())
                }
                DeckSource::Category(name) if self.services.categories.get(name).is_none() => {
                    Some(format!("Unknown category. Category: '{name}'."))
                }
                DeckSource::Custom(words) if words.is_empty() => {
                    Some("The custom deck has no words.".to_string())
                }
                DeckSource::Category(_) | DeckSource::Custom(_) => None,
            }
        };
        match reason {
            Some(reason) => Err(Error::Domain(DomainError::InvalidConfig(reason))),
            None => Ok(()),
        }
    }

    fn on_timer_ticked(&mut self, timer_id: TimerId, remaining: u32) -> Result<(), Error> {
        self.ensure_live_timer(timer_id)?;
        match self.stage() {
            RoundFsmState::Countdown => {
                self.state.countdown_remaining = remaining;
                Ok(())
            }
            RoundFsmState::Active => {
                self.state.seconds_remaining = remaining;
                Ok(())
            }
            stage @ (RoundFsmState::Home | RoundFsmState::Ended) => {
                Err(Error::StaleEventDropped(StaleEvent::WrongStage {
                    event: "TimerTicked",
                    stage,
                }))
            }
        }
    }

    fn on_timer_expired(&mut self, timer_id: TimerId) -> Result<(), Error> {
        self.ensure_live_timer(timer_id)?;
        match self.stage() {
            RoundFsmState::Countdown => self.enter_active(),
            RoundFsmState::Active => self.time_up(),
            stage @ (RoundFsmState::Home | RoundFsmState::Ended) => {
                Err(Error::StaleEventDropped(StaleEvent::WrongStage {
                    event: "TimerExpired",
                    stage,
                }))
            }
        }
    }

    fn enter_active(&mut self) -> Result<(), Error> {
        let config = self.state.config.clone().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "Round left the countdown without a configuration. RoundId: '{}'.",
                self.state.id
            ))
        })?;
        self.process_event(&RoundFsmInput::CountdownFinished)?;

        self.state.deck = match &config.deck {
            DeckSource::Category(name) => {
                WordDeck::shuffled(self.services.categories.get(name).unwrap_or(&[]))
            }
            DeckSource::Custom(words) => WordDeck::prebuilt(words.clone()),
        };
        self.state.countdown_remaining = 0;
        self.state.seconds_remaining = config.duration_seconds;
        self.state.current_index = 0;
        self.state.correct_count = 0;
        self.state.skip_count = 0;
        self.state.result_log = ResultLog::default();
        ROUNDS_STARTED.inc();
        log::info!(
            "Round active. RoundId: '{}', Deck: '{}', Words: '{}', Seconds: '{}'.",
            self.state.id,
            config.label(),
            self.state.deck.len(),
            config.duration_seconds
        );

        if let DeckSource::Category(name) = &config.deck {
            self.record_usage(name);
        }

        if self.state.deck.is_empty() {
            return self.end(&RoundFsmInput::DeckExhausted);
        }
        self.start_timer(config.duration_seconds);
        self.lookup_current_image();
        Ok(())
    }

    fn mark(&mut self, mark: MarkEvent) -> Result<(), Error> {
        let index = self.state.current_index;
        let word = self.state.deck.get(index).cloned().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "Active round without a current word. RoundId: '{}', Index: '{}', Words: '{}'.",
                self.state.id,
                index,
                self.state.deck.len()
            ))
        })?;

        // The armed window belonged to the word being consumed
        self.disambiguator.cancel();
        let correct = mark.is_correct();
        self.state.result_log.record(word, correct);
        if correct {
            self.state.correct_count += 1;
        } else {
            self.state.skip_count += 1;
        }
        self.state.current_index += 1;

        if self.state.current_index == self.state.deck.len() {
            self.end(&RoundFsmInput::DeckExhausted)
        } else {
            self.lookup_current_image();
            Ok(())
        }
    }

    /// The word on screen when time runs out counts as missed; the index stays on it.
    fn time_up(&mut self) -> Result<(), Error> {
        self.state.seconds_remaining = 0;
        if let Some(word) = self.state.deck.get(self.state.current_index).cloned() {
            self.state.result_log.record(word, false);
            self.state.skip_count += 1;
        }
        self.end(&RoundFsmInput::TimeUp)
    }

    fn end(&mut self, input: &RoundFsmInput) -> Result<(), Error> {
        self.timer.cancel();
        self.disambiguator.cancel();
        self.process_event(input)?;
        ROUNDS_ENDED.inc();
        log::info!(
            "Round ended. RoundId: '{}', Deck: '{}', Reason: '{:?}', Correct: '{}', Skipped: '{}'.",
            self.state.id,
            self.label(),
            input,
            self.state.correct_count,
            self.state.skip_count
        );
        Ok(())
    }

    fn on_image_resolved(
        &mut self,
        round_id: RoundId,
        index: usize,
        url: Option<String>,
    ) -> Result<(), Error> {
        if round_id != self.state.id || round_id == 0 {
            return Err(Error::StaleEventDropped(StaleEvent::UnknownRound(round_id)));
        }
        if let Some(url) = url {
            self.state.images.insert(index, url);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.timer.cancel();
        self.disambiguator.cancel();
        self.state = RoundState::default();
    }

    fn start_timer(&mut self, seconds: u32) {
        self.next_timer_id += 1;
        let timer_id = self.next_timer_id;
        let tick_tx = self.events_tx.clone();
        let expire_tx = self.events_tx.clone();

        self.timer.start(
            timer_id,
            seconds,
            move |remaining| {
                let _ = tick_tx.send(RoundEvent::TimerTicked {
                    timer_id,
                    remaining,
                });
            },
            move || {
                let _ = expire_tx.send(RoundEvent::TimerExpired { timer_id });
            },
        );
    }

    fn record_usage(&self, category: &str) {
        let usage = Arc::clone(&self.services.usage);
        let category = category.to_string();
        tokio::spawn(async move {
            if let Err(error) = usage.increment_usage(&category).await {
                log::warn!("Could not record the category usage. Category: '{category}', Error: '{error}'.");
            }
        });
    }

    fn lookup_current_image(&self) {
        let Some(DeckSource::Category(name)) = self.state.config.as_ref().map(|config| &config.deck) else {
            return;
        };
        if !self.services.image_categories.contains(name) {
            return;
        }
        let index = self.state.current_index;
        let Some(word) = self.state.deck.get(index) else {
            return;
        };
        if self.state.images.contains_key(&index) {
            return;
        }

        let images = Arc::clone(&self.services.images);
        let events_tx = self.events_tx.clone();
        let round_id = self.state.id;
        let name = word.lookup_name().to_string();
        tokio::spawn(async move {
            let url = images.lookup_image(&name).await;
            let _ = events_tx.send(RoundEvent::ImageResolved {
                round_id,
                index,
                url,
            });
        });
    }

    fn ensure_stage(&self, expected: RoundFsmState, event: &'static str) -> Result<(), Error> {
        if self.stage() == expected {
            Ok(())
        } else {
            Err(Error::StaleEventDropped(StaleEvent::WrongStage {
                event,
                stage: self.stage(),
            }))
        }
    }

    fn ensure_live_timer(&self, timer_id: TimerId) -> Result<(), Error> {
        if self.timer.id() == Some(timer_id) {
            Ok(())
        } else {
            Err(Error::StaleEventDropped(StaleEvent::UnknownTimer(timer_id)))
        }
    }

    fn label(&self) -> &str {
        self.state
            .config
            .as_ref()
            .map(|config| config.label())
            .unwrap_or_default()
    }

    fn process_event(&mut self, event: &RoundFsmInput) -> Result<(), Error> {
        self.fsm.consume(event).map(|_| ()).map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The fsm in state {:?} can't transition with an event {:?}. Error: '{error}'.",
                self.fsm.state(),
                event
            ))
        })
    }
}
