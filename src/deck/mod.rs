pub mod category;

use std::fmt::{Display, Formatter};

use rand::{seq::SliceRandom, thread_rng};
use serde::{Deserialize, Serialize};

/// A word or phrase to guess. Bilingual entries show the primary label with the
/// secondary one underneath.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordEntry {
    Plain(String),
    Bilingual {
        #[serde(alias = "chinese")]
        primary: String,
        #[serde(alias = "english", default, skip_serializing_if = "Option::is_none")]
        secondary: Option<String>,
    },
}

impl WordEntry {
    pub fn primary(&self) -> &str {
        match self {
            WordEntry::Plain(label) => label,
            WordEntry::Bilingual { primary, .. } => primary,
        }
    }

    pub fn secondary(&self) -> Option<&str> {
        match self {
            WordEntry::Plain(_) => None,
            WordEntry::Bilingual { secondary, .. } => secondary.as_deref(),
        }
    }

    /// The label used to search for a picture of the entry, favouring the
    /// latin-script secondary label when there is one.
    pub fn lookup_name(&self) -> &str {
        self.secondary().unwrap_or_else(|| self.primary())
    }

    /// The entry with its labels trimmed, or `None` when nothing is left of the primary label.
    pub fn trimmed(self) -> Option<WordEntry> {
        let word = match self {
            WordEntry::Plain(label) => WordEntry::Plain(label.trim().to_string()),
            WordEntry::Bilingual { primary, secondary } => WordEntry::Bilingual {
                primary: primary.trim().to_string(),
                secondary: secondary
                    .map(|secondary| secondary.trim().to_string())
                    .filter(|secondary| !secondary.is_empty()),
            },
        };
        if word.primary().is_empty() {
            None
        } else {
            Some(word)
        }
    }
}

impl From<&str> for WordEntry {
    fn from(value: &str) -> Self {
        WordEntry::Plain(value.to_string())
    }
}

impl From<String> for WordEntry {
    fn from(value: String) -> Self {
        WordEntry::Plain(value)
    }
}

impl Display for WordEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.secondary() {
            Some(secondary) => write!(f, "{} / {}", self.primary(), secondary),
            None => write!(f, "{}", self.primary()),
        }
    }
}

/// The words of one round, in the order they are shown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordDeck {
    words: Vec<WordEntry>,
}

impl WordDeck {
    pub fn shuffled(words: &[WordEntry]) -> Self {
        let mut words = words.to_vec();
        words.shuffle(&mut thread_rng());
        WordDeck { words }
    }

    /// Custom decks are played in the order the host typed them.
    pub fn prebuilt(words: Vec<WordEntry>) -> Self {
        WordDeck { words }
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.words.get(index)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{WordDeck, WordEntry};

    fn words(amount: usize) -> Vec<WordEntry> {
        (0..amount)
            .map(|index| WordEntry::from(format!("w{index}")))
            .collect()
    }

    #[test]
    fn trimmed_drops_padding_and_blank_entries() {
        assert_eq!(WordEntry::from(" 蛋撻 ").trimmed(), Some(WordEntry::from("蛋撻")));
        assert_eq!(WordEntry::from("   ").trimmed(), None);
        assert_eq!(
            WordEntry::Bilingual {
                primary: " 叉燒 ".to_string(),
                secondary: Some("  ".to_string()),
            }
            .trimmed(),
            Some(WordEntry::Bilingual {
                primary: "叉燒".to_string(),
                secondary: None,
            })
        );
    }

    #[test]
    fn shuffled_deck_keeps_every_word_once() {
        let source = words(20);

        let deck = WordDeck::shuffled(&source);

        assert_eq!(deck.len(), source.len());
        let unique: HashSet<&str> = deck.words().iter().map(|word| word.primary()).collect();
        assert_eq!(unique.len(), source.len());
    }

    #[test]
    fn different_decks_are_shuffled_in_different_order() {
        let source = words(30);

        let deck_1 = WordDeck::shuffled(&source);
        let deck_2 = WordDeck::shuffled(&source);

        // Not deterministic, but two identical permutations of 30 words are vanishingly unlikely
        assert_ne!(deck_1, deck_2);
    }

    #[test]
    fn shuffle_is_not_biased_towards_the_input_order() {
        let source = words(4);
        let mut first_word_counts = [0usize; 4];

        for _ in 0..4000 {
            let deck = WordDeck::shuffled(&source);
            let first = source
                .iter()
                .position(|word| word == deck.get(0).unwrap())
                .unwrap();
            first_word_counts[first] += 1;
        }

        // Each word should lead roughly a quarter of the decks
        for count in first_word_counts {
            assert!((800..1200).contains(&count), "count: {count}");
        }
    }

    #[test]
    fn prebuilt_deck_keeps_the_given_order() {
        let deck = WordDeck::prebuilt(words(3));

        assert_eq!(deck.get(0), Some(&WordEntry::from("w0")));
        assert_eq!(deck.get(2), Some(&WordEntry::from("w2")));
        assert_eq!(deck.get(3), None);
    }

    #[test]
    fn word_entries_are_parsed_from_plain_and_bilingual_json() {
        let entries: Vec<WordEntry> = serde_json::from_str(
            r#"["飲茶", {"chinese": "周潤發", "english": "Chow Yun-fat"}, {"primary": "叉燒"}]"#,
        )
        .unwrap();

        assert_eq!(entries[0], WordEntry::Plain("飲茶".to_string()));
        assert_eq!(entries[1].primary(), "周潤發");
        assert_eq!(entries[1].secondary(), Some("Chow Yun-fat"));
        assert_eq!(entries[2].secondary(), None);
    }

    #[test]
    fn lookup_name_prefers_the_secondary_label() {
        let entry = WordEntry::Bilingual {
            primary: "梁朝偉".to_string(),
            secondary: Some("Tony Leung".to_string()),
        };

        assert_eq!(entry.lookup_name(), "Tony Leung");
        assert_eq!(WordEntry::from("叉燒").lookup_name(), "叉燒");
    }
}
