//! Recent winners
//!
//! Persisted to storage, keeps the last 10 picks, newest first.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of winners to keep
pub const MAX_HISTORY: usize = 10;

/// A single past winner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub name: String,
    /// Unix timestamp (ms) of the pick
    pub timestamp: f64,
}

/// Recent winners, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WinnerHistory {
    pub records: Vec<WinnerRecord>,
}

impl WinnerHistory {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "spin_wheel_history";

    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Add a winner at the front, dropping the oldest past the limit
    pub fn record(&mut self, name: &str, timestamp: f64) {
        self.records.insert(
            0,
            WinnerRecord {
                name: name.to_string(),
                timestamp,
            },
        );
        self.records.truncate(MAX_HISTORY);
    }

    pub fn latest(&self) -> Option<&WinnerRecord> {
        self.records.first()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Load history, starting fresh on any storage problem
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json::<WinnerHistory, _>(store, Self::STORAGE_KEY) {
            Ok(Some(mut history)) => {
                history.records.truncate(MAX_HISTORY);
                log::info!("Loaded {} past winners", history.records.len());
                history
            }
            Ok(None) => {
                log::info!("No winner history found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding winner history: {}", e);
                Self::new()
            }
        }
    }

    /// Save history; failures are logged, not fatal
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Winner history saved ({} entries)", self.records.len()),
            Err(e) => log::warn!("Failed to save winner history: {}", e),
        }
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_relative(now: f64, timestamp: f64) -> String {
    let diff_secs = (now - timestamp).max(0.0) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_newest_first_and_capped() {
        let mut history = WinnerHistory::new();
        for i in 0..15 {
            history.record(&format!("n{}", i), i as f64);
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.latest().unwrap().name, "n14");
        assert_eq!(history.records.last().unwrap().name, "n5");
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(WinnerHistory::load(&store).is_empty());

        let mut history = WinnerHistory::new();
        history.record("Ada", 1_000.0);
        history.record("Grace", 2_000.0);
        history.save(&mut store);

        assert_eq!(WinnerHistory::load(&store), history);

        store
            .set_item(WinnerHistory::STORAGE_KEY, "[1,2,3]")
            .unwrap();
        assert!(WinnerHistory::load(&store).is_empty());
    }

    #[test]
    fn test_format_relative() {
        let now = 10.0 * 24.0 * 3_600_000.0;
        assert_eq!(format_relative(now, now - 5_000.0), "Just now");
        assert_eq!(format_relative(now, now - 60_000.0), "1 min ago");
        assert_eq!(format_relative(now, now - 5.0 * 60_000.0), "5 mins ago");
        assert_eq!(format_relative(now, now - 3_600_000.0), "1 hour ago");
        assert_eq!(format_relative(now, now - 3.0 * 3_600_000.0), "3 hours ago");
        assert_eq!(format_relative(now, now - 24.0 * 3_600_000.0), "Yesterday");
        assert_eq!(format_relative(now, now - 72.0 * 3_600_000.0), "3 days ago");
        // Clock skew never yields a negative age
        assert_eq!(format_relative(now, now + 10_000.0), "Just now");
    }
}
