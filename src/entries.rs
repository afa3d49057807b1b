//! Names on the wheel
//!
//! Order matters: an entry's index decides both its slice position and its
//! color. Every mutation is written through to storage before returning, and
//! only takes effect in memory once the write succeeded.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::DEFAULT_ENTRIES;
use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Storage key for the entry list
pub const ENTRIES_STORAGE_KEY: &str = "spin_wheel_entries";

/// Split raw multi-line input into entries: one per line, trimmed, blanks dropped
pub fn parse_entries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The default list used when nothing has been saved yet
pub fn default_entries() -> Vec<String> {
    DEFAULT_ENTRIES.iter().map(|s| s.to_string()).collect()
}

/// Ordered, persisted list of names
#[derive(Debug)]
pub struct EntryStore<S> {
    entries: Vec<String>,
    store: S,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Restore the saved list, or seed the default list if none exists.
    /// Corrupt saved data is returned as an error.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let entries = match load_json::<Vec<String>, _>(&store, ENTRIES_STORAGE_KEY)? {
            Some(saved) => {
                log::info!("Loaded {} entries", saved.len());
                // Saved data may predate trimming rules; normalize it
                saved
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            None => {
                log::info!("No saved entries, seeding defaults");
                default_entries()
            }
        };
        Ok(Self { entries, store })
    }

    /// Start from the default list without reading storage
    pub fn with_defaults(store: S) -> Self {
        Self {
            entries: default_entries(),
            store,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Entries joined one per line, suitable for the text input
    pub fn to_text(&self) -> String {
        self.entries.join("\n")
    }

    /// Replace the whole list from raw text input
    pub fn replace_from_text(&mut self, text: &str) -> Result<usize, StoreError> {
        self.commit(parse_entries(text))
    }

    /// Uniform random permutation
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, StoreError> {
        let mut shuffled = self.entries.clone();
        shuffled.shuffle(rng);
        self.commit(shuffled)
    }

    /// Lexicographic ascending order
    pub fn sort(&mut self) -> Result<usize, StoreError> {
        let mut sorted = self.entries.clone();
        sorted.sort();
        self.commit(sorted)
    }

    /// Remove the first entry equal to `name`. A miss changes nothing.
    pub fn remove(&mut self, name: &str) -> Result<usize, StoreError> {
        match self.entries.iter().position(|e| e == name) {
            Some(index) => {
                let mut remaining = self.entries.clone();
                remaining.remove(index);
                self.commit(remaining)
            }
            None => Ok(self.entries.len()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save `entries`, then adopt them. On error the current list is kept.
    fn commit(&mut self, entries: Vec<String>) -> Result<usize, StoreError> {
        save_json(&mut self.store, ENTRIES_STORAGE_KEY, &entries)?;
        log::debug!("Entries saved ({} names)", entries.len());
        self.entries = entries;
        Ok(self.entries.len())
    }
}
