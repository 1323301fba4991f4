use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words/lists");

pub const DEFAULT_LIST: &str = "halloween";

#[derive(Debug, Error)]
pub enum WordsError {
    #[error("word list `{0}` not found")]
    MissingList(String),
    #[error("word list `{name}` is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no word list configured for length {0}")]
    UnknownLength(usize),
}

/// Where round targets come from.
pub trait WordSource: std::fmt::Debug {
    /// A random candidate of exactly `length` letters, if that length is configured.
    fn pick_random(&self, length: usize) -> Option<String>;
    /// Whether `word` is one of the known answers for its length.
    fn is_answer(&self, word: &str) -> bool;
}

#[derive(Deserialize)]
struct WordListFile {
    name: String,
    words: BTreeMap<usize, Vec<String>>,
}

/// Outcome of [`WordBank::add_words`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddReport {
    pub added: Vec<String>,
    pub rejected: Vec<String>,
}

/// Answer lists keyed by word length, plus the matching allow-lists used
/// when the dictionary cannot be reached.
#[derive(Debug, Clone)]
pub struct WordBank {
    pub name: String,
    lists: BTreeMap<usize, Vec<String>>,
    allowed: BTreeMap<usize, HashSet<String>>,
}

impl WordBank {
    /// Load one of the embedded lists by name.
    pub fn embedded(name: &str) -> Result<Self, WordsError> {
        let file = WORDS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| WordsError::MissingList(name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordsError::MissingList(name.to_string()))?;

        let parsed: WordListFile =
            serde_json::from_str(contents).map_err(|source| WordsError::Malformed {
                name: name.to_string(),
                source,
            })?;

        Ok(Self::from_lists(parsed.name, parsed.words))
    }

    /// Build a bank from raw lists, dropping entries whose length or
    /// alphabet does not match their key.
    pub fn from_lists(name: impl Into<String>, raw: BTreeMap<usize, Vec<String>>) -> Self {
        let name = name.into();
        let mut lists = BTreeMap::new();
        let mut allowed = BTreeMap::new();
        let mut removed_any = false;

        for (length, words) in raw {
            let (good, bad): (Vec<String>, Vec<String>) = words
                .into_iter()
                .partition(|w| is_well_formed(w, length));

            if !bad.is_empty() {
                removed_any = true;
                warn!(length, removed = ?bad, "removed words with wrong length");
            }

            allowed.insert(length, good.iter().cloned().collect::<HashSet<_>>());
            lists.insert(length, good);
        }

        if !removed_any {
            debug!(list = %name, "all word lists have correct lengths");
        }

        Self {
            name,
            lists,
            allowed,
        }
    }

    #[cfg(test)]
    pub fn lengths(&self) -> Vec<usize> {
        self.lists.keys().copied().collect()
    }

    #[cfg(test)]
    pub fn words(&self, length: usize) -> &[String] {
        self.lists.get(&length).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Extend the list for `length`. Words are trimmed and uppercased;
    /// anything that is not exactly `length` letters A-Z is rejected.
    pub fn add_words<I, S>(&mut self, length: usize, words: I) -> Result<AddReport, WordsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (Some(list), Some(allowed)) =
            (self.lists.get_mut(&length), self.allowed.get_mut(&length))
        else {
            return Err(WordsError::UnknownLength(length));
        };

        let mut report = AddReport::default();
        for word in words {
            let raw = word.as_ref();
            let upper = raw.trim().to_uppercase();
            if !is_well_formed(&upper, length) {
                report.rejected.push(raw.to_string());
                continue;
            }
            if allowed.insert(upper.clone()) {
                list.push(upper.clone());
                report.added.push(upper);
            }
        }

        info!(
            length,
            added = report.added.len(),
            rejected = report.rejected.len(),
            "extended word list"
        );
        Ok(report)
    }
}

impl WordSource for WordBank {
    fn pick_random(&self, length: usize) -> Option<String> {
        let mut rng = rand::thread_rng();
        self.lists.get(&length)?.choose(&mut rng).cloned()
    }

    fn is_answer(&self, word: &str) -> bool {
        self.allowed
            .get(&word.chars().count())
            .is_some_and(|set| set.contains(word))
    }
}

fn is_well_formed(word: &str, length: usize) -> bool {
    word.chars().count() == length && word.chars().all(|c| c.is_ascii_uppercase())
}
