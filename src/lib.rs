//! Spin Wheel - a name-picker wheel for the browser
//!
//! Core modules:
//! - `sim`: Spin physics and winner resolution (pure, deterministic)
//! - `entries`: The persisted list of names on the wheel
//! - `renderer`: Wheel drawing against a 2D surface abstraction
//! - `presenter`: Winner modal state and confetti bursts
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `app`: Controller that wires everything into a frame-driven loop

pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod entries;
pub mod history;
pub mod persistence;
pub mod presenter;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{FrameEvent, WheelApp};
pub use entries::EntryStore;
pub use history::WinnerHistory;
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use settings::{Settings, SpinTuning};

use glam::DVec2;

/// Wheel configuration constants
pub mod consts {
    /// Initial angular velocity range (degrees per tick)
    pub const MIN_SPIN_VELOCITY: f64 = 20.0;
    pub const MAX_SPIN_VELOCITY: f64 = 40.0;

    /// Per-tick multiplicative decay range (upper bound exclusive)
    pub const MIN_DECAY: f64 = 0.985;
    pub const MAX_DECAY: f64 = 0.990;

    /// Spin ends once velocity drops below this (degrees per tick)
    pub const STOP_VELOCITY: f64 = 0.05;

    /// A spin needs at least this many names on the wheel
    pub const MIN_ENTRIES: usize = 2;

    /// Segment fill colors, assigned by index modulo length
    pub const PALETTE: [&str; 8] = [
        "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    ];

    /// Names seeded on first launch
    pub const DEFAULT_ENTRIES: [&str; 6] = ["Alice", "Bob", "Charlie", "Diana", "Ethan", "Fiona"];

    /// Confetti pieces per winner burst
    pub const CONFETTI_COUNT: usize = 100;

    /// Label font sizes (px); steps down past 20 and 40 entries
    pub const LABEL_FONT_LARGE: f64 = 18.0;
    pub const LABEL_FONT_MEDIUM: f64 = 14.0;
    pub const LABEL_FONT_SMALL: f64 = 10.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert_eq!(wrap_angle(TAU), 0.0);
        let tiny = wrap_angle(-1e-300);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, PI / 2.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }
}
