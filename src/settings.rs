//! Wheel settings and preferences
//!
//! Persisted separately from the entry list.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Spin physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    /// Initial velocity range (degrees per tick)
    pub min_velocity: f64,
    pub max_velocity: f64,
    /// Decay range; the upper bound is never drawn
    pub min_decay: f64,
    pub max_decay: f64,
    /// Velocity below which the spin stops (degrees per tick)
    pub stop_velocity: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            min_velocity: MIN_SPIN_VELOCITY,
            max_velocity: MAX_SPIN_VELOCITY,
            min_decay: MIN_DECAY,
            max_decay: MAX_DECAY,
            stop_velocity: STOP_VELOCITY,
        }
    }
}

impl SpinTuning {
    /// Clamp into ranges where every spin is guaranteed to stop
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

        let stop_velocity = finite_or(self.stop_velocity, STOP_VELOCITY).clamp(0.001, 10.0);

        let min_velocity = finite_or(self.min_velocity, MIN_SPIN_VELOCITY).clamp(1.0, 360.0);
        let max_velocity = finite_or(self.max_velocity, MAX_SPIN_VELOCITY).clamp(1.0, 360.0);
        let (min_velocity, max_velocity) = if min_velocity <= max_velocity {
            (min_velocity, max_velocity)
        } else {
            (max_velocity, min_velocity)
        };

        let min_decay = finite_or(self.min_decay, MIN_DECAY).clamp(0.5, 0.999);
        let max_decay = finite_or(self.max_decay, MAX_DECAY).clamp(0.5, 0.999);
        let (min_decay, max_decay) = if min_decay <= max_decay {
            (min_decay, max_decay)
        } else {
            (max_decay, min_decay)
        };

        Self {
            min_velocity,
            max_velocity,
            min_decay,
            max_decay,
            stop_velocity,
        }
    }
}

/// Wheel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spin physics
    pub spin: SpinTuning,

    // === Celebration ===
    /// Confetti burst when a winner is picked
    pub confetti: bool,
    /// Pieces per burst
    pub confetti_count: usize,

    // === Audio ===
    /// Tick and fanfare sounds
    pub sound: bool,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spin: SpinTuning::default(),

            confetti: true,
            confetti_count: CONFETTI_COUNT,

            sound: true,
            volume: 0.6,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "spin_wheel_settings";

    /// Clamp every field into its valid range
    pub fn sanitized(self) -> Self {
        Self {
            spin: self.spin.sanitized(),
            confetti: self.confetti,
            confetti_count: self.confetti_count.min(500),
            sound: self.sound,
            volume: if self.volume.is_finite() {
                self.volume.clamp(0.0, 1.0)
            } else {
                0.0
            },
        }
    }

    /// Effective confetti count (0 when disabled)
    pub fn effective_confetti_count(&self) -> usize {
        if self.confetti { self.confetti_count } else { 0 }
    }

    /// Effective volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound { self.volume } else { 0.0 }
    }

    /// Load settings, falling back to defaults on any storage problem
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json::<Settings, _>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring saved settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged, not fatal
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_match_constants() {
        let tuning = SpinTuning::default();
        assert_eq!(tuning.min_velocity, 20.0);
        assert_eq!(tuning.max_velocity, 40.0);
        assert_eq!(tuning.min_decay, 0.985);
        assert_eq!(tuning.max_decay, 0.990);
        assert_eq!(tuning.stop_velocity, 0.05);
        assert_eq!(tuning.sanitized(), tuning);
    }

    #[test]
    fn test_sanitize_keeps_spins_finite() {
        let wild = SpinTuning {
            min_velocity: 90.0,
            max_velocity: 5.0,
            min_decay: 1.5,
            max_decay: f64::NAN,
            stop_velocity: 0.0,
        }
        .sanitized();
        assert!(wild.min_velocity <= wild.max_velocity);
        assert!(wild.max_decay < 1.0);
        assert!(wild.min_decay <= wild.max_decay);
        assert!(wild.stop_velocity > 0.0);
    }

    #[test]
    fn test_effective_values() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_confetti_count(), CONFETTI_COUNT);
        settings.confetti = false;
        settings.sound = false;
        assert_eq!(settings.effective_confetti_count(), 0);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let mut settings = Settings::default();
        settings.volume = 0.25;
        settings.confetti_count = 40;
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_and_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store
            .set_item(Settings::STORAGE_KEY, r#"{"sound":false}"#)
            .unwrap();
        let partial = Settings::load(&store);
        assert!(!partial.sound);
        assert_eq!(partial.spin, SpinTuning::default());

        store.set_item(Settings::STORAGE_KEY, "garbage").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
