use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ImageSettings;
use crate::error::Error;

/// Finds a picture for a word, used by the categories of famous people.
///
/// Lookups are best-effort: `None` covers both "nothing found" and any failure.
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn lookup_image(&self, name: &str) -> Option<String>;
}

pub struct NoImageLookup;

#[async_trait]
impl ImageLookup for NoImageLookup {
    async fn lookup_image(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Person search on The Movie Database.
pub struct TmdbImageLookup {
    client: reqwest::Client,
    search_url: String,
    image_base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct PersonSearch {
    #[serde(default)]
    results: Vec<Person>,
}

#[derive(Deserialize)]
struct Person {
    profile_path: Option<String>,
}

impl TmdbImageLookup {
    pub fn new(settings: &ImageSettings) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Could not build the image lookup HTTP client. Error: '{error}'."
                ))
            })?;

        Ok(TmdbImageLookup {
            client,
            search_url: settings.search_url.clone(),
            image_base_url: settings.image_base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    async fn search(&self, name: &str) -> Result<PersonSearch, reqwest::Error> {
        self.client
            .get(&self.search_url)
            .query(&[("api_key", self.api_key.as_str()), ("query", name)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    fn first_profile_url(&self, search: PersonSearch) -> Option<String> {
        search
            .results
            .into_iter()
            .next()
            .and_then(|person| person.profile_path)
            .map(|profile_path| format!("{}{}", self.image_base_url, profile_path))
    }
}

#[async_trait]
impl ImageLookup for TmdbImageLookup {
    async fn lookup_image(&self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            return None;
        }
        match self.search(name).await {
            Ok(search) => self.first_profile_url(search),
            Err(error) => {
                log::warn!("Image lookup failed. Name: '{name}', Error: '{error}'.");
                None
            }
        }
    }
}

pub fn from_settings(settings: &ImageSettings) -> Result<Arc<dyn ImageLookup>, Error> {
    if settings.enabled {
        log::info!(
            "Image lookup enabled. Categories: '{}'.",
            settings.categories.join(",")
        );
        Ok(Arc::new(TmdbImageLookup::new(settings)?))
    } else {
        Ok(Arc::new(NoImageLookup))
    }
}
