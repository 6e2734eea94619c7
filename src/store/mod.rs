pub mod document_store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::deck::WordEntry;
use crate::error::domain_error::DomainError;
use crate::error::Error;

pub use document_store::DocumentStore;

pub type DeckId = String;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub category: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMeta {
    pub max_items_per_person: u32,
    pub total_people: u32,
}

impl DeckMeta {
    pub fn max_items(&self) -> usize {
        (self.max_items_per_person as usize).saturating_mul(self.total_people as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDeck {
    pub words: Vec<WordEntry>,
    pub max_items_per_person: u32,
    pub total_people: u32,
    pub max_items: usize,
    pub created_at: i64,
}

impl CustomDeck {
    pub const MINIMUM_WORDS: usize = 2;

    /// Trims the words and checks them against the deck limits.
    pub fn new(words: Vec<WordEntry>, meta: DeckMeta) -> Result<Self, Error> {
        let words: Vec<WordEntry> = words.into_iter().filter_map(WordEntry::trimmed).collect();
        let max_items = meta.max_items();

        if words.len() < CustomDeck::MINIMUM_WORDS {
            return Err(Error::Domain(DomainError::InvalidDeck(format!(
                "Not enough words. ActualWords: '{}', MinimumWords: '{}'.",
                words.len(),
                CustomDeck::MINIMUM_WORDS
            ))));
        }
        if words.len() > max_items {
            return Err(Error::Domain(DomainError::InvalidDeck(format!(
                "Too many words. ActualWords: '{}', MaximumWords: '{}'.",
                words.len(),
                max_items
            ))));
        }

        Ok(CustomDeck {
            words,
            max_items_per_person: meta.max_items_per_person,
            total_people: meta.total_people,
            max_items,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}

/// Usage counters per category, shown on the admin leaderboard.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Finds or creates the counter of the category and adds one to it.
    async fn increment_usage(&self, category: &str) -> Result<u64, Error>;

    /// Every counter, most used category first.
    async fn leaderboard(&self) -> Result<Vec<CategoryUsage>, Error>;
}

#[async_trait]
pub trait DeckStore: Send + Sync {
    /// Creates a deck, or overwrites it when an id is given.
    async fn save_deck(
        &self,
        id: Option<DeckId>,
        words: Vec<WordEntry>,
        meta: DeckMeta,
    ) -> Result<DeckId, Error>;
}
