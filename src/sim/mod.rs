//! Wheel simulation module
//!
//! Spin physics and winner geometry. Pure and deterministic:
//! - One update per frame tick, no wall-clock time
//! - Randomness only through an injected generator
//! - No rendering or platform dependencies

pub mod resolver;
pub mod spin;

pub use resolver::{pointer_angle, resolve_winner, slice_angle, winning_index};
pub use spin::{SpinEngine, SpinPhase, SpinSession, TickEvent, ticks_to_stop};
