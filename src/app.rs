//! Wheel controller
//!
//! Owns all mutable state and exposes the user-facing operations. A driver
//! (the browser's animation-frame loop, or a plain loop natively) calls
//! `frame` once per display refresh while a spin is in flight.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::entries::EntryStore;
use crate::history::WinnerHistory;
use crate::persistence::{KeyValueStore, StoreError};
use crate::presenter::{PresenterAction, ResultPresenter};
use crate::settings::Settings;
use crate::sim::{SpinEngine, SpinPhase, TickEvent};

/// What happened during one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// No spin in flight; nothing to redraw
    Idle,
    /// Wheel moved; `crossed` slice boundaries passed the pointer
    Spinning { crossed: u32 },
    /// Wheel stopped and the winner is being presented
    Winner { index: usize, name: String },
}

/// The whole wheel application, independent of any UI toolkit
pub struct WheelApp<S: KeyValueStore + Clone> {
    entries: EntryStore<S>,
    store: S,
    settings: Settings,
    history: WinnerHistory,
    engine: SpinEngine,
    presenter: ResultPresenter,
    rng: Pcg32,
}

impl<S: KeyValueStore + Clone> WheelApp<S> {
    /// Restore everything from storage. Corrupt entry data is an error;
    /// settings and history quietly fall back to defaults.
    pub fn new(store: S, seed: u64) -> Result<Self, StoreError> {
        let entries = EntryStore::load(store.clone())?;
        Ok(Self::with_entries(entries, store, seed))
    }

    /// Build around an already loaded entry list
    pub fn with_entries(entries: EntryStore<S>, store: S, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let history = WinnerHistory::load(&store);
        log::info!(
            "Wheel ready with {} entries (seed {})",
            entries.len(),
            seed
        );
        Self {
            entries,
            engine: SpinEngine::new(settings.spin),
            settings,
            history,
            store,
            presenter: ResultPresenter::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn entries(&self) -> &[String] {
        self.entries.entries()
    }

    pub fn entry_store(&self) -> &EntryStore<S> {
        &self.entries
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &WinnerHistory {
        &self.history
    }

    /// Whether the spin button should be enabled
    pub fn can_spin(&self) -> bool {
        !self.engine.is_busy() && self.entries.len() >= crate::consts::MIN_ENTRIES
    }

    /// Replace and persist settings; spin tuning applies from the next spin
    pub fn update_settings(&mut self, settings: Settings) {
        log::debug!("Settings changed: {:?}", settings);
        self.settings = settings.sanitized();
        self.engine.set_tuning(self.settings.spin);
        self.settings.save(&mut self.store);
    }

    fn editable(&self, op: &str) -> bool {
        if self.engine.is_busy() {
            log::warn!("Ignoring {} while the wheel is spinning", op);
            return false;
        }
        true
    }

    /// Replace the list from raw text. `None` when ignored mid-spin.
    pub fn set_entries_text(&mut self, text: &str) -> Result<Option<usize>, StoreError> {
        if !self.editable("edit") {
            return Ok(None);
        }
        self.entries.replace_from_text(text).map(Some)
    }

    pub fn shuffle(&mut self) -> Result<Option<usize>, StoreError> {
        if !self.editable("shuffle") {
            return Ok(None);
        }
        self.entries.shuffle(&mut self.rng).map(Some)
    }

    pub fn sort(&mut self) -> Result<Option<usize>, StoreError> {
        if !self.editable("sort") {
            return Ok(None);
        }
        self.entries.sort().map(Some)
    }

    /// Start a spin, closing any shown result. False (and nothing changes)
    /// when one is already running or there are too few names.
    pub fn spin(&mut self) -> bool {
        if !self.engine.start(self.entries.len(), &mut self.rng) {
            return false;
        }
        self.presenter.dismiss();
        log::info!("Spinning {} entries", self.entries.len());
        true
    }

    /// Abort a spin in flight
    pub fn cancel_spin(&mut self) -> bool {
        self.engine.cancel()
    }

    /// Advance one frame
    pub fn frame(&mut self, now_ms: f64) -> FrameEvent {
        match self.engine.tick() {
            TickEvent::Idle => {
                // A stop from a previous frame may still be waiting
                if matches!(self.engine.phase(), SpinPhase::Resolving { .. }) {
                    self.resolve(now_ms)
                } else {
                    FrameEvent::Idle
                }
            }
            TickEvent::Advanced { crossed } => FrameEvent::Spinning { crossed },
            TickEvent::Stopped { .. } => self.resolve(now_ms),
        }
    }

    fn resolve(&mut self, now_ms: f64) -> FrameEvent {
        let Some(index) = self.engine.take_winner() else {
            return FrameEvent::Idle;
        };
        let Some(name) = self.entries.get(index).map(str::to_string) else {
            log::warn!("Winner index {} out of range", index);
            return FrameEvent::Idle;
        };

        self.presenter
            .show(&name, &mut self.rng, self.settings.effective_confetti_count());
        self.history.record(&name, now_ms);
        self.history.save(&mut self.store);

        FrameEvent::Winner { index, name }
    }

    /// Close the result modal without changing anything
    pub fn dismiss(&mut self) {
        self.presenter.dismiss();
    }

    /// Take the shown winner off the wheel and close the modal.
    /// Returns the new count, or `None` if no winner was showing.
    pub fn remove_winner(&mut self) -> Result<Option<usize>, StoreError> {
        let Some(name) = self.presenter.dismiss() else {
            return Ok(None);
        };
        let count = self.entries.remove(&name)?;
        log::info!("Removed {} ({} left)", name, count);
        Ok(Some(count))
    }

    /// Close the modal and immediately spin again. With too few names left
    /// the modal stays open.
    pub fn spin_again(&mut self) -> bool {
        self.spin()
    }

    /// Run a modal action
    pub fn apply(&mut self, action: PresenterAction) -> Result<(), StoreError> {
        match action {
            PresenterAction::Dismiss => self.dismiss(),
            PresenterAction::RemoveWinner => {
                self.remove_winner()?;
            }
            PresenterAction::SpinAgain => {
                self.spin_again();
            }
        }
        Ok(())
    }

    /// Clear the winner history
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history.save(&mut self.store);
    }
}
