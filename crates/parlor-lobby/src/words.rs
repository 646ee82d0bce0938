//! The word bank: category names mapped to secret-word payloads.
//!
//! The dataset is plain data — an ordered list of categories, each with
//! a nonempty word list. A compiled-in default bank ships with the
//! server; deployments can replace it with a JSON file of the same
//! shape:
//!
//! ```json
//! [
//!   { "name": "Vehicles", "words": [ { "text": "Submarine" }, ... ] },
//!   ...
//! ]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use parlor_protocol::Word;
use serde::{Deserialize, Serialize};

/// Category used when the configured one is unknown or has no words.
///
/// Fixed, not configurable: the default bank always contains it, and a
/// custom bank that omits it only fails at round start for rooms whose
/// configured category is also missing.
pub const FALLBACK_CATEGORY: &str = "Vehicles";

/// One named category and its word list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Display name, also the key clients select by.
    pub name: String,
    /// The secret-word payloads for this category.
    pub words: Vec<Word>,
}

/// Errors that can occur while loading a word bank from disk.
#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    /// Reading the file failed.
    #[error("failed to read word bank: {0}")]
    Io(#[from] std::io::Error),

    /// The file isn't valid word-bank JSON.
    #[error("failed to parse word bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The full dataset of categories, in display order.
///
/// Order matters: the first category is the default for new lobbies.
#[derive(Debug, Clone)]
pub struct WordBank {
    categories: Vec<Category>,
}

impl WordBank {
    /// Creates a bank from an explicit category list.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Loads a bank from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WordBankError> {
        let categories = serde_json::from_reader(reader)?;
        Ok(Self { categories })
    }

    /// Loads a bank from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WordBankError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// All category names, in display order.
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// The default category for new lobbies: the first one in the bank.
    pub fn default_category(&self) -> String {
        self.categories
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }

    /// The word list for a category, if it exists and is nonempty.
    pub fn words(&self, category: &str) -> Option<&[Word]> {
        self.categories
            .iter()
            .find(|c| c.name == category && !c.words.is_empty())
            .map(|c| c.words.as_slice())
    }

    /// Resolves a category to a usable word list, falling back to
    /// [`FALLBACK_CATEGORY`] when the requested one is unknown or empty.
    ///
    /// Returns the name actually resolved along with its words, or
    /// `None` when the fallback is unusable too.
    pub fn resolve<'a>(&'a self, category: &'a str) -> Option<(&'a str, &'a [Word])> {
        if let Some(words) = self.words(category) {
            return Some((category, words));
        }
        self.words(FALLBACK_CATEGORY)
            .map(|words| (FALLBACK_CATEGORY, words))
    }
}

impl Default for WordBank {
    /// The compiled-in dataset used when no file is supplied.
    fn default() -> Self {
        Self::new(vec![
            Category {
                name: "Vehicles".into(),
                words: vec![
                    Word::with_hint("Submarine", "Travels underwater"),
                    Word::with_hint("Helicopter", "Takes off vertically"),
                    Word::with_hint("Tractor", "Works the fields"),
                    Word::with_hint("Skateboard", "Four small wheels"),
                    Word::with_hint("Hot Air Balloon", "Drifts with the wind"),
                    Word::with_hint("Ferry", "Carries cars across water"),
                ],
            },
            Category {
                name: "Animals".into(),
                words: vec![
                    Word::with_hint("Octopus", "Eight arms"),
                    Word::with_hint("Penguin", "Dresses formally"),
                    Word::with_hint("Kangaroo", "Carries a passenger"),
                    Word::with_hint("Chameleon", "Hard to spot"),
                    Word::with_hint("Owl", "Works the night shift"),
                    Word::with_hint("Beaver", "Builds dams"),
                ],
            },
            Category {
                name: "Food".into(),
                words: vec![
                    Word::with_hint("Pancake", "Flipped in a pan"),
                    Word::with_hint("Sushi", "Often wrapped in seaweed"),
                    Word::with_hint("Popcorn", "Explodes when heated"),
                    Word::with_hint("Meatball", "Rolled by hand"),
                    Word::with_hint("Croissant", "Buttery and layered"),
                    Word::with_hint("Watermelon", "Mostly water"),
                ],
            },
            Category {
                name: "Places".into(),
                words: vec![
                    Word::with_hint("Lighthouse", "Warns ships"),
                    Word::with_hint("Library", "Keep your voice down"),
                    Word::with_hint("Volcano", "Best viewed from afar"),
                    Word::with_hint("Casino", "The house always wins"),
                    Word::with_hint("Igloo", "Built from its surroundings"),
                    Word::with_hint("Greenhouse", "Warm and full of plants"),
                ],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bank_contains_fallback_category() {
        let bank = WordBank::default();
        assert!(bank.words(FALLBACK_CATEGORY).is_some());
    }

    #[test]
    fn test_default_category_is_first() {
        let bank = WordBank::default();
        assert_eq!(bank.default_category(), bank.category_names()[0]);
    }

    #[test]
    fn test_words_for_unknown_category_is_none() {
        let bank = WordBank::default();
        assert!(bank.words("Cryptids").is_none());
    }

    #[test]
    fn test_resolve_known_category_keeps_name() {
        let bank = WordBank::default();
        let (name, words) = bank.resolve("Animals").unwrap();
        assert_eq!(name, "Animals");
        assert!(!words.is_empty());
    }

    #[test]
    fn test_resolve_unknown_category_falls_back() {
        let bank = WordBank::default();
        let (name, _) = bank.resolve("Cryptids").unwrap();
        assert_eq!(name, FALLBACK_CATEGORY);
    }

    #[test]
    fn test_resolve_empty_category_falls_back() {
        let bank = WordBank::new(vec![
            Category {
                name: "Empty".into(),
                words: vec![],
            },
            Category {
                name: FALLBACK_CATEGORY.into(),
                words: vec![Word::new("Bus")],
            },
        ]);
        let (name, _) = bank.resolve("Empty").unwrap();
        assert_eq!(name, FALLBACK_CATEGORY);
    }

    #[test]
    fn test_resolve_without_fallback_is_none() {
        let bank = WordBank::new(vec![Category {
            name: "Empty".into(),
            words: vec![],
        }]);
        assert!(bank.resolve("Empty").is_none());
        assert!(bank.resolve("Missing").is_none());
    }

    #[test]
    fn test_from_reader_parses_bank_json() {
        let json = r#"[
            { "name": "Tools", "words": [
                { "text": "Hammer" },
                { "text": "Wrench", "hint": "Turns bolts" }
            ]}
        ]"#;
        let bank = WordBank::from_reader(json.as_bytes()).unwrap();
        assert_eq!(bank.category_names(), vec!["Tools".to_string()]);
        assert_eq!(bank.words("Tools").unwrap()[1].hint.as_deref(), Some("Turns bolts"));
    }

    #[test]
    fn test_from_reader_rejects_malformed_json() {
        let result = WordBank::from_reader("{broken".as_bytes());
        assert!(matches!(result, Err(WordBankError::Parse(_))));
    }
}
