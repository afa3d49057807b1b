//! Spin engine
//!
//! Rotation advances once per frame under geometric velocity decay:
//! fast at first, easing out smoothly, with no fixed duration. How long a
//! spin lasts depends only on the random initial velocity and decay draw.
//!
//! The engine is a small state machine driven from outside:
//! `Idle -> Spinning -> Resolving -> Idle`, with `cancel` as an explicit
//! `Spinning -> Idle` transition.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::resolver::{slice_angle, winning_index};
use crate::consts::MIN_ENTRIES;
use crate::settings::SpinTuning;
use crate::wrap_angle;

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinPhase {
    /// Waiting for a spin request
    Idle,
    /// Wheel is turning
    Spinning,
    /// Wheel stopped; winner not yet collected
    Resolving { winner: usize },
}

/// State of one spin. Dropped once the wheel stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinSession {
    /// Current velocity (degrees per tick)
    pub velocity: f64,
    /// Per-tick velocity multiplier
    pub decay: f64,
    /// Segment count captured at spin start
    pub segments: usize,
    /// Ticks elapsed
    pub ticks: u32,
}

/// Result of advancing one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing to do
    Idle,
    /// Wheel moved; `crossed` slice boundaries passed the pointer
    Advanced { crossed: u32 },
    /// Wheel came to rest with `winner` under the pointer
    Stopped { winner: usize, crossed: u32 },
}

/// Rotation owner and spin state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinEngine {
    /// Wheel rotation (radians, [0, 2π))
    rotation: f64,
    phase: SpinPhase,
    session: Option<SpinSession>,
    tuning: SpinTuning,
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new(SpinTuning::default())
    }
}

impl SpinEngine {
    pub fn new(tuning: SpinTuning) -> Self {
        Self {
            rotation: 0.0,
            phase: SpinPhase::Idle,
            session: None,
            tuning: tuning.sanitized(),
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn tuning(&self) -> &SpinTuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: SpinTuning) {
        self.tuning = tuning.sanitized();
    }

    /// Current velocity (degrees per tick); 0 when not spinning
    pub fn velocity(&self) -> f64 {
        self.session.map(|s| s.velocity).unwrap_or(0.0)
    }

    /// True from spin start until the winner is collected
    pub fn is_busy(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// Start a spin with a random velocity and decay.
    /// Returns false (and changes nothing) when the wheel is busy or has too few entries.
    pub fn start<R: Rng + ?Sized>(&mut self, entry_count: usize, rng: &mut R) -> bool {
        if !self.can_start(entry_count) {
            return false;
        }
        let t = self.tuning;
        let velocity = if t.min_velocity < t.max_velocity {
            rng.random_range(t.min_velocity..=t.max_velocity)
        } else {
            t.min_velocity
        };
        let decay = if t.min_decay < t.max_decay {
            rng.random_range(t.min_decay..t.max_decay)
        } else {
            t.min_decay
        };
        self.start_with(entry_count, velocity, decay)
    }

    /// Start a spin with a fixed velocity and decay.
    /// Velocity must be finite and non-negative, decay strictly inside (0, 1);
    /// anything else would never come to rest and is refused.
    pub fn start_with(&mut self, entry_count: usize, velocity: f64, decay: f64) -> bool {
        if !self.can_start(entry_count) {
            return false;
        }
        if !(velocity.is_finite() && velocity >= 0.0 && decay > 0.0 && decay < 1.0) {
            log::warn!(
                "Refusing spin with velocity {} and decay {}",
                velocity,
                decay
            );
            return false;
        }
        log::debug!(
            "Spin started: {} segments, velocity {:.2} deg/tick, decay {:.4}",
            entry_count,
            velocity,
            decay
        );
        self.session = Some(SpinSession {
            velocity,
            decay,
            segments: entry_count,
            ticks: 0,
        });
        self.phase = SpinPhase::Spinning;
        true
    }

    fn can_start(&self, entry_count: usize) -> bool {
        entry_count >= MIN_ENTRIES && self.phase == SpinPhase::Idle
    }

    /// Advance the wheel by one frame tick
    pub fn tick(&mut self) -> TickEvent {
        if self.phase != SpinPhase::Spinning {
            return TickEvent::Idle;
        }
        let Some(session) = self.session.as_mut() else {
            self.phase = SpinPhase::Idle;
            return TickEvent::Idle;
        };

        session.velocity *= session.decay;
        session.ticks += 1;

        let slice = slice_angle(session.segments);
        let before = self.rotation;
        let after = before + session.velocity * PI / 180.0;
        let crossed = ((after / slice).floor() - (before / slice).floor()).max(0.0) as u32;
        self.rotation = wrap_angle(after);

        if session.velocity >= self.tuning.stop_velocity {
            return TickEvent::Advanced { crossed };
        }

        let winner = winning_index(self.rotation, session.segments);
        log::debug!(
            "Spin stopped after {} ticks at {:.4} rad, winner index {}",
            session.ticks,
            self.rotation,
            winner
        );
        self.session = None;
        self.phase = SpinPhase::Resolving { winner };
        TickEvent::Stopped { winner, crossed }
    }

    /// Abort a spin in flight. The wheel stays where it is.
    pub fn cancel(&mut self) -> bool {
        if self.phase != SpinPhase::Spinning {
            return false;
        }
        log::debug!("Spin cancelled at {:.4} rad", self.rotation);
        self.session = None;
        self.phase = SpinPhase::Idle;
        true
    }

    /// Collect the winner of a finished spin, returning the engine to idle
    pub fn take_winner(&mut self) -> Option<usize> {
        match self.phase {
            SpinPhase::Resolving { winner } => {
                self.phase = SpinPhase::Idle;
                Some(winner)
            }
            _ => None,
        }
    }

    /// Run a started spin to completion, returning the winner and tick count
    pub fn run_to_rest(&mut self) -> Option<(usize, u32)> {
        let mut ticks = 0;
        loop {
            match self.tick() {
                TickEvent::Idle => return None,
                TickEvent::Advanced { .. } => ticks += 1,
                TickEvent::Stopped { winner, .. } => return Some((winner, ticks + 1)),
            }
        }
    }
}

/// Ticks until a spin stops: the smallest k with `velocity * decay^k < stop`.
/// Requires `0 < decay < 1` and `stop > 0`.
pub fn ticks_to_stop(velocity: f64, decay: f64, stop: f64) -> u32 {
    if velocity < stop {
        return 1;
    }
    ((stop / velocity).ln() / decay.ln()).floor() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f64::consts::TAU;

    #[test]
    fn test_start_requires_two_entries() {
        let mut engine = SpinEngine::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!engine.start(0, &mut rng));
        assert!(!engine.start(1, &mut rng));
        assert_eq!(engine.phase(), SpinPhase::Idle);
        assert!(engine.start(2, &mut rng));
        assert_eq!(engine.phase(), SpinPhase::Spinning);
    }

    #[test]
    fn test_start_while_busy_is_noop() {
        let mut engine = SpinEngine::default();
        assert!(engine.start_with(4, 30.0, 0.987));
        engine.tick();
        let before = engine.clone();

        assert!(!engine.start_with(4, 40.0, 0.985));
        assert_eq!(engine.session(), before.session());
        assert_eq!(engine.rotation(), before.rotation());

        // Still single-flight while the winner is waiting to be collected
        engine.run_to_rest();
        assert!(matches!(engine.phase(), SpinPhase::Resolving { .. }));
        assert!(!engine.start_with(4, 30.0, 0.987));
        engine.take_winner();
        assert!(engine.start_with(4, 30.0, 0.987));
    }

    #[test]
    fn test_random_draw_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for _ in 0..500 {
            let mut engine = SpinEngine::default();
            assert!(engine.start(6, &mut rng));
            let session = *engine.session().unwrap();
            // First tick has not been applied yet
            assert!((20.0..=40.0).contains(&session.velocity));
            assert!((0.985..0.990).contains(&session.decay));
        }
    }

    #[test]
    fn test_tick_decays_and_accumulates() {
        let mut engine = SpinEngine::default();
        engine.start_with(4, 30.0, 0.99);
        assert_eq!(engine.tick(), TickEvent::Advanced { crossed: 0 });
        let v = 30.0 * 0.99;
        assert!((engine.velocity() - v).abs() < 1e-12);
        assert!((engine.rotation() - v.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_stays_wrapped() {
        let mut engine = SpinEngine::default();
        engine.start_with(3, 40.0, 0.989);
        while engine.is_spinning() {
            engine.tick();
            assert!((0.0..TAU).contains(&engine.rotation()));
        }
    }

    #[test]
    fn test_stop_clears_session_and_resolves() {
        let mut engine = SpinEngine::default();
        engine.start_with(4, 20.0, 0.985);
        let (winner, ticks) = engine.run_to_rest().unwrap();
        assert_eq!(ticks, ticks_to_stop(20.0, 0.985, 0.05));
        assert_eq!(engine.velocity(), 0.0);
        assert!(engine.session().is_none());
        assert_eq!(winner, winning_index(engine.rotation(), 4));
        assert_eq!(engine.take_winner(), Some(winner));
        assert_eq!(engine.phase(), SpinPhase::Idle);
        assert_eq!(engine.take_winner(), None);
    }

    #[test]
    fn test_slowest_and_fastest_spins() {
        // Fastest stop: lowest velocity, strongest decay
        assert_eq!(ticks_to_stop(20.0, 0.985, 0.05), 397);
        // Longest spin: highest velocity, weakest decay
        assert_eq!(ticks_to_stop(40.0, 0.990, 0.05), 666);

        let mut engine = SpinEngine::default();
        engine.start_with(2, 40.0, 0.990);
        let (_, ticks) = engine.run_to_rest().unwrap();
        assert!((665..=666).contains(&ticks));
    }

    #[test]
    fn test_crossings_count_slice_boundaries() {
        let mut engine = SpinEngine::default();
        engine.start_with(8, 40.0, 0.989);
        let mut crossed_total = 0u64;
        let mut turned = 0.0;
        loop {
            let before = engine.rotation();
            let event = engine.tick();
            // A single tick moves well under a full turn
            turned += (engine.rotation() - before).rem_euclid(TAU);
            match event {
                TickEvent::Advanced { crossed } => crossed_total += crossed as u64,
                TickEvent::Stopped { crossed, .. } => {
                    crossed_total += crossed as u64;
                    break;
                }
                TickEvent::Idle => unreachable!(),
            }
        }
        assert_eq!(crossed_total, (turned / slice_angle(8)).floor() as u64);
    }

    #[test]
    fn test_start_with_refuses_spins_that_never_stop() {
        let mut engine = SpinEngine::default();
        assert!(!engine.start_with(2, 30.0, 1.0));
        assert!(!engine.start_with(2, 30.0, 1.5));
        assert!(!engine.start_with(2, 30.0, 0.0));
        assert!(!engine.start_with(2, 30.0, f64::NAN));
        assert!(!engine.start_with(2, f64::INFINITY, 0.99));
        assert!(!engine.start_with(2, -5.0, 0.99));
        assert_eq!(engine.phase(), SpinPhase::Idle);
        assert!(engine.session().is_none());
        assert_eq!(engine.run_to_rest(), None);

        // Zero velocity is a valid, instant stop
        assert!(engine.start_with(2, 0.0, 0.99));
        assert_eq!(engine.run_to_rest().map(|(_, ticks)| ticks), Some(1));
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut engine = SpinEngine::default();
        assert!(!engine.cancel());
        engine.start_with(5, 25.0, 0.987);
        engine.tick();
        let rotation = engine.rotation();
        assert!(engine.cancel());
        assert_eq!(engine.phase(), SpinPhase::Idle);
        assert_eq!(engine.rotation(), rotation);
        assert_eq!(engine.tick(), TickEvent::Idle);
        assert_eq!(engine.take_winner(), None);
    }

    #[test]
    fn test_seeded_spins_are_reproducible() {
        let spin = |seed: u64| {
            let mut engine = SpinEngine::default();
            engine.start(7, &mut Pcg32::seed_from_u64(seed));
            engine.run_to_rest()
        };
        assert_eq!(spin(99), spin(99));
    }

    proptest! {
        #[test]
        fn prop_spin_always_terminates_within_bounds(
            velocity in 20.0f64..=40.0,
            decay in 0.985f64..0.990,
        ) {
            let predicted = ticks_to_stop(velocity, decay, 0.05);
            prop_assert!((397..=666).contains(&predicted));

            let mut engine = SpinEngine::default();
            engine.start_with(10, velocity, decay);
            let (winner, ticks) = engine.run_to_rest().unwrap();
            prop_assert!(winner < 10);
            // Repeated multiplication can drift one tick from the closed form
            prop_assert!(ticks.abs_diff(predicted) <= 1);
        }
    }
}
