use serde::Serialize;

use crate::deck::WordEntry;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultEntry {
    pub word: WordEntry,
    pub correct: bool,
}

/// Append-only record of the words consumed in a round, in consumption order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultLog {
    entries: Vec<ResultEntry>,
}

impl ResultLog {
    pub fn record(&mut self, word: WordEntry, correct: bool) {
        self.entries.push(ResultEntry { word, correct });
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.correct).count()
    }
}
