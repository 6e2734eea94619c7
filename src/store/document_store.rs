use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use async_trait::async_trait;
use rand::distributions::{Alphanumeric, DistString};
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;

use crate::deck::WordEntry;
use crate::error::Error;
use crate::store::{CategoryUsage, CustomDeck, DeckId, DeckMeta, DeckStore, UsageStore};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Collections of JSON documents kept in memory, and written to a JSON file after
/// every change when a path is configured.
pub struct DocumentStore {
    collections: RwLock<Collections>,
    path: Option<PathBuf>,
}

impl DocumentStore {
    pub const CATEGORY_STATS: &'static str = "categoryStats";
    pub const CUSTOM_DECKS: &'static str = "customDecks";
    const DOCUMENT_ID_LENGTH: usize = 20;

    pub fn in_memory() -> Self {
        DocumentStore {
            collections: RwLock::new(Collections::default()),
            path: None,
        }
    }

    /// Loads the documents of a previous run, starting empty when the file does not exist yet.
    pub async fn open(path: &str) -> Result<Self, Error> {
        let collections = match fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|error| {
                Error::PersistenceFailure(format!(
                    "Could not parse the store file. File: '{path}', Error: '{error}'."
                ))
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Store file not found, starting with an empty store. File: '{path}'.");
                Collections::default()
            }
            Err(error) => {
                return Err(Error::PersistenceFailure(format!(
                    "Could not read the store file. File: '{path}', Error: '{error}'."
                )))
            }
        };

        Ok(DocumentStore {
            collections: RwLock::new(collections),
            path: Some(PathBuf::from(path)),
        })
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, Error> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    pub async fn set(&self, collection: &str, id: &str, document: Value) -> Result<(), Error> {
        let mut collections = self.collections.write().await;
        let mut updated = collections.clone();
        updated
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        self.flush(&updated).await?;
        *collections = updated;
        Ok(())
    }

    /// Stores a document under a new random id and returns the id.
    pub async fn add(&self, collection: &str, document: Value) -> Result<String, Error> {
        let mut collections = self.collections.write().await;
        let mut updated = collections.clone();
        let documents = updated.entry(collection.to_string()).or_default();
        let id = loop {
            let id = Alphanumeric.sample_string(&mut rand::thread_rng(), DocumentStore::DOCUMENT_ID_LENGTH);
            if !documents.contains_key(&id) {
                break id;
            }
        };
        documents.insert(id.clone(), document);
        self.flush(&updated).await?;
        *collections = updated;
        Ok(id)
    }

    pub async fn list(&self, collection: &str) -> Result<Vec<Value>, Error> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn flush(&self, collections: &Collections) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(collections).map_err(|error| {
            Error::PersistenceFailure(format!("Could not serialize the store. Error: '{error}'."))
        })?;
        // Write next to the target and rename, so a crash never leaves a half written file
        let temporary_path = path.with_extension("tmp");
        fs::write(&temporary_path, content).await.map_err(|error| {
            Error::PersistenceFailure(format!(
                "Could not write the store file. File: '{}', Error: '{error}'.",
                temporary_path.display()
            ))
        })?;
        fs::rename(&temporary_path, path).await.map_err(|error| {
            Error::PersistenceFailure(format!(
                "Could not replace the store file. File: '{}', Error: '{error}'.",
                path.display()
            ))
        })
    }
}

#[async_trait]
impl UsageStore for DocumentStore {
    // Read then write without holding the lock in between: two concurrent increments of
    // the same category can undercount by one.
    async fn increment_usage(&self, category: &str) -> Result<u64, Error> {
        let current = match self.get(DocumentStore::CATEGORY_STATS, category).await? {
            Some(document) => serde_json::from_value::<CategoryUsage>(document)
                .map(|usage| usage.count)
                .unwrap_or_else(|error| {
                    log::warn!("Resetting an unreadable usage counter. Category: '{category}', Error: '{error}'.");
                    0
                }),
            None => 0,
        };
        let usage = CategoryUsage {
            category: category.to_string(),
            count: current + 1,
        };
        let document = serde_json::to_value(&usage).map_err(|error| {
            Error::PersistenceFailure(format!(
                "Could not serialize the usage counter. Error: '{error}'."
            ))
        })?;
        self.set(DocumentStore::CATEGORY_STATS, category, document)
            .await?;
        Ok(usage.count)
    }

    async fn leaderboard(&self) -> Result<Vec<CategoryUsage>, Error> {
        let mut usages: Vec<CategoryUsage> = self
            .list(DocumentStore::CATEGORY_STATS)
            .await?
            .into_iter()
            .filter_map(|document| serde_json::from_value(document).ok())
            .collect();
        usages.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(usages)
    }
}

#[async_trait]
impl DeckStore for DocumentStore {
    async fn save_deck(
        &self,
        id: Option<DeckId>,
        words: Vec<WordEntry>,
        meta: DeckMeta,
    ) -> Result<DeckId, Error> {
        let deck = CustomDeck::new(words, meta)?;
        let document = serde_json::to_value(&deck).map_err(|error| {
            Error::PersistenceFailure(format!("Could not serialize the deck. Error: '{error}'."))
        })?;

        match id {
            Some(id) => {
                self.set(DocumentStore::CUSTOM_DECKS, &id, document).await?;
                log::info!("Custom deck overwritten. DeckId: '{id}', Words: '{}'.", deck.words.len());
                Ok(id)
            }
            None => {
                let id = self.add(DocumentStore::CUSTOM_DECKS, document).await?;
                log::info!("Custom deck created. DeckId: '{id}', Words: '{}'.", deck.words.len());
                Ok(id)
            }
        }
    }
}
