//! Winner resolution geometry
//!
//! The pointer is fixed at angle 0 on screen while the wheel turns. Rather
//! than tracking where every slice has moved to, rotate the pointer backward
//! into the wheel's own frame and look up which slice it lands in there.
//! Positive rotation is clockwise on screen, the same direction slices are
//! laid out in by the renderer.

use std::f64::consts::TAU;

use crate::wrap_angle;

/// Angular width of one slice for `n` segments
#[inline]
pub fn slice_angle(n: usize) -> f64 {
    TAU / n as f64
}

/// Pointer position in wheel-local coordinates, in [0, 2π)
#[inline]
pub fn pointer_angle(rotation: f64) -> f64 {
    wrap_angle(TAU - wrap_angle(rotation))
}

/// Index of the slice under the pointer. `n` must be at least 1.
pub fn winning_index(rotation: f64, n: usize) -> usize {
    debug_assert!(n > 0, "winning_index needs at least one segment");
    let index = (pointer_angle(rotation) / slice_angle(n)).floor() as usize;
    index.min(n.saturating_sub(1))
}

/// The entry under the pointer, if there are any entries
pub fn resolve_winner(entries: &[String], rotation: f64) -> Option<&str> {
    if entries.is_empty() {
        return None;
    }
    entries
        .get(winning_index(rotation, entries.len()))
        .map(String::as_str)
}
