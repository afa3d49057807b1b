//! Confetti burst generation
//!
//! Pieces are plain data; the DOM layer turns each into an animated element.

use rand::Rng;

use crate::consts::PALETTE;

/// One piece of confetti
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Horizontal start position (% of viewport width)
    pub left: f64,
    pub color: &'static str,
    /// Fall duration (seconds)
    pub duration: f64,
    /// Start delay (seconds)
    pub delay: f64,
    /// Edge length (px)
    pub size: f64,
    /// Initial tilt (degrees)
    pub rotation: f64,
}

/// Generate a burst of `count` pieces with randomized look and timing
pub fn confetti_burst<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<ConfettiPiece> {
    (0..count)
        .map(|_| ConfettiPiece {
            left: rng.random_range(0.0..100.0),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            duration: rng.random_range(2.0..4.0),
            delay: rng.random_range(0.0..0.5),
            size: rng.random_range(6.0..12.0),
            rotation: rng.random_range(0.0..360.0),
        })
        .collect()
}

/// Time until the last piece of a burst has landed (seconds)
pub fn burst_lifetime(pieces: &[ConfettiPiece]) -> f64 {
    pieces
        .iter()
        .map(|p| p.delay + p.duration)
        .fold(0.0, f64::max)
}
