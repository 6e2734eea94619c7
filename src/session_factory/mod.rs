pub mod actor;
pub mod actor_client;

use rand::distributions::{Alphanumeric, DistString};
use std::collections::HashMap;

use crate::config::{RoundSettings, SessionSettings};
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::round::actor::RoundActor;
use crate::round::actor_client::RoundClient;
use crate::round::RoundServices;
use crate::session_factory::actor_client::SessionFactoryClient;

/// Everything a new session is spawned with.
#[derive(Clone)]
pub struct SessionFactorySettings {
    pub round: RoundSettings,
    pub session: SessionSettings,
    pub services: RoundServices,
}

pub struct SessionFactory {
    sessions: HashMap<String, RoundClient>,
    settings: SessionFactorySettings,
}

impl SessionFactory {
    const SESSION_ID_LENGTH: usize = 5;

    pub fn new(settings: SessionFactorySettings) -> Self {
        SessionFactory {
            sessions: HashMap::default(),
            settings,
        }
    }

    pub fn create_new_session(&mut self, session_factory: SessionFactoryClient) -> String {
        let id = self.create_unique_session_id();
        self.sessions.insert(
            id.clone(),
            RoundActor::spawn(
                &id,
                self.settings.round.clone(),
                self.settings.session.clone(),
                self.settings.services.clone(),
                session_factory,
            ),
        );
        log::info!("Session created. SessionId: '{id}', Sessions: '{}'.", self.sessions.len());

        id
    }

    pub fn remove_session(&mut self, session_id: &str) -> Option<RoundClient> {
        let removed = self.sessions.remove(session_id);
        if removed.is_some() {
            log::info!("Session removed. SessionId: '{session_id}', Sessions: '{}'.", self.sessions.len());
        }
        removed
    }

    pub fn get_session(&self, session_id: &str) -> Result<&RoundClient, Error> {
        match self.sessions.get(session_id) {
            Some(session) => Ok(session),
            None => Err(Error::Domain(DomainError::SessionDoesNotExist(
                session_id.to_string(),
            ))),
        }
    }

    // Ids are read aloud and typed by hand, so the easily confused characters are avoided
    fn create_unique_session_id(&self) -> String {
        loop {
            let id = Alphanumeric
                .sample_string(&mut rand::thread_rng(), SessionFactory::SESSION_ID_LENGTH)
                .replace('O', "P")
                .replace('0', "1")
                .replace('I', "J")
                .replace('l', "m");
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }
}
