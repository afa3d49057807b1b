//! Wheel drawing
//!
//! Slices start at the current rotation and advance clockwise in entry
//! order, so entry 0 sits under the pointer (angle 0, right edge) when the
//! rotation is 0.

use std::f64::consts::TAU;

use glam::DVec2;

use super::surface::{Shadow, Surface, TextAlign};
use crate::consts::{LABEL_FONT_LARGE, LABEL_FONT_MEDIUM, LABEL_FONT_SMALL, PALETTE};
use crate::polar_to_cartesian;
use crate::sim::slice_angle;

/// Space kept between the wheel rim and the viewport edge (room for the pointer)
pub const RIM_MARGIN: f64 = 30.0;
/// Smallest radius the wheel shrinks to
pub const MIN_RADIUS: f64 = 60.0;
/// Center hub radius
pub const HUB_RADIUS: f64 = 18.0;
/// Gap between a label's end and the rim
pub const LABEL_PADDING: f64 = 15.0;

const SLICE_OUTLINE: &str = "#FFFFFF";
const LABEL_COLOR: &str = "#FFFFFF";
const HUB_COLOR: &str = "#FFFFFF";
const HUB_OUTLINE: &str = "#333333";
const POINTER_COLOR: &str = "#333333";
const EMPTY_COLOR: &str = "#E0E0E0";
const EMPTY_TEXT_COLOR: &str = "#666666";

const LABEL_SHADOW: Shadow = Shadow {
    color: "rgba(0, 0, 0, 0.5)",
    blur: 4.0,
    offset_x: 1.0,
    offset_y: 1.0,
};

/// Where the wheel sits in the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub width: f64,
    pub height: f64,
    pub center: DVec2,
    pub radius: f64,
}

impl WheelLayout {
    /// Fit the wheel to a viewport, centered
    pub fn from_viewport(width: f64, height: f64) -> Self {
        let radius = (width.min(height) / 2.0 - RIM_MARGIN).max(MIN_RADIUS);
        Self {
            width,
            height,
            center: DVec2::new(width / 2.0, height / 2.0),
            radius,
        }
    }
}

/// Fill color for slice `index`
pub fn segment_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Label font size (px) for a wheel with `n` slices
pub fn label_font_size(n: usize) -> f64 {
    if n > 40 {
        LABEL_FONT_SMALL
    } else if n > 20 {
        LABEL_FONT_MEDIUM
    } else {
        LABEL_FONT_LARGE
    }
}

/// How many characters fit between the hub and the rim at a font size
pub fn label_max_chars(radius: f64, font_size: f64) -> usize {
    // Rough average glyph width for a bold sans-serif face
    let glyph = font_size * 0.6;
    let room = radius - HUB_RADIUS - LABEL_PADDING * 2.0;
    ((room / glyph).floor() as usize).max(4)
}

/// Shorten a label to `max_chars`, marking the cut with an ellipsis
pub fn fit_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut short: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Draw the whole wheel at `rotation` (radians)
pub fn draw_wheel<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &WheelLayout,
    rotation: f64,
    entries: &[String],
) {
    surface.clear(layout.width, layout.height);

    if entries.is_empty() {
        draw_empty(surface, layout);
    } else {
        draw_slices(surface, layout, rotation, entries);
        draw_hub(surface, layout);
    }
    draw_pointer(surface, layout);
}

fn draw_slices<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &WheelLayout,
    rotation: f64,
    entries: &[String],
) {
    let DVec2 { x: cx, y: cy } = layout.center;
    let r = layout.radius;
    let slice = slice_angle(entries.len());
    let font_size = label_font_size(entries.len());
    let font = format!("bold {}px sans-serif", font_size);
    let max_chars = label_max_chars(r, font_size);

    for (i, name) in entries.iter().enumerate() {
        let start = rotation + i as f64 * slice;
        let end = start + slice;

        surface.begin_path();
        surface.move_to(cx, cy);
        surface.arc(cx, cy, r, start, end);
        surface.close_path();
        surface.fill(segment_color(i));
        surface.stroke(SLICE_OUTLINE, 2.0);

        // Label runs along the slice bisector, ending near the rim
        surface.save();
        surface.translate(cx, cy);
        surface.rotate(start + slice / 2.0);
        surface.set_text_align(TextAlign::Right);
        surface.set_font(&font);
        surface.set_shadow(Some(LABEL_SHADOW));
        surface.fill_text(
            &fit_label(name, max_chars),
            r - LABEL_PADDING,
            font_size / 3.0,
            LABEL_COLOR,
        );
        surface.restore();
    }
}

fn draw_hub<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout) {
    let DVec2 { x: cx, y: cy } = layout.center;
    surface.begin_path();
    surface.arc(cx, cy, HUB_RADIUS, 0.0, TAU);
    surface.close_path();
    surface.fill(HUB_COLOR);
    surface.stroke(HUB_OUTLINE, 3.0);
}

fn draw_empty<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout) {
    let DVec2 { x: cx, y: cy } = layout.center;
    surface.begin_path();
    surface.arc(cx, cy, layout.radius, 0.0, TAU);
    surface.close_path();
    surface.fill(EMPTY_COLOR);
    surface.stroke(SLICE_OUTLINE, 2.0);

    surface.set_shadow(None);
    surface.set_text_align(TextAlign::Center);
    surface.set_font(&format!("{}px sans-serif", LABEL_FONT_LARGE));
    surface.fill_text("Add some names", cx, cy, EMPTY_TEXT_COLOR);
}

/// Fixed pointer at angle 0, tip just inside the rim
fn draw_pointer<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout) {
    let tip = layout.center + polar_to_cartesian(layout.radius - 8.0, 0.0);
    let back = layout.center + polar_to_cartesian(layout.radius + 18.0, 0.0);

    surface.set_shadow(None);
    surface.begin_path();
    surface.move_to(tip.x, tip.y);
    surface.line_to(back.x, back.y - 12.0);
    surface.line_to(back.x, back.y + 12.0);
    surface.close_path();
    surface.fill(POINTER_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{DrawCommand, RecordingSurface};
    use crate::sim::winning_index;
    use crate::wrap_angle;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Name {}", i)).collect()
    }

    fn layout() -> WheelLayout {
        WheelLayout::from_viewport(600.0, 500.0)
    }

    #[test]
    fn test_layout_fits_smaller_dimension() {
        let l = layout();
        assert_eq!(l.center, DVec2::new(300.0, 250.0));
        assert_eq!(l.radius, 250.0 - RIM_MARGIN);
        assert_eq!(WheelLayout::from_viewport(50.0, 50.0).radius, MIN_RADIUS);
    }

    #[test]
    fn test_colors_cycle_every_eight() {
        assert_eq!(segment_color(0), PALETTE[0]);
        assert_eq!(segment_color(8), PALETTE[0]);
        assert_eq!(segment_color(13), PALETTE[5]);
    }

    #[test]
    fn test_font_steps_down() {
        assert_eq!(label_font_size(2), LABEL_FONT_LARGE);
        assert_eq!(label_font_size(20), LABEL_FONT_LARGE);
        assert_eq!(label_font_size(21), LABEL_FONT_MEDIUM);
        assert_eq!(label_font_size(40), LABEL_FONT_MEDIUM);
        assert_eq!(label_font_size(41), LABEL_FONT_SMALL);
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Short", 10), "Short");
        assert_eq!(fit_label("Exactly10!", 10), "Exactly10!");
        assert_eq!(fit_label("Bartholomew", 6), "Barth…");
        assert_eq!(fit_label("Zoë Ångström", 4), "Zoë…");
    }

    #[test]
    fn test_draws_one_slice_per_entry() {
        let entries = names(10);
        let mut surface = RecordingSurface::new();
        let rotation = 0.3;
        draw_wheel(&mut surface, &layout(), rotation, &entries);

        let l = layout();
        let slices: Vec<_> = surface
            .arcs()
            .into_iter()
            .filter(|(r, _, _)| *r == l.radius)
            .collect();
        assert_eq!(slices.len(), 10);
        let slice = TAU / 10.0;
        for (i, (_, start, end)) in slices.iter().enumerate() {
            assert!((start - (rotation + i as f64 * slice)).abs() < 1e-9);
            assert!((end - start - slice).abs() < 1e-9);
        }

        // Slice fills cycle through the palette, then hub and pointer
        let fills = surface.fills();
        for i in 0..10 {
            assert_eq!(fills[i], segment_color(i));
        }
        assert_eq!(fills.len(), 12);
        assert_eq!(surface.texts(), entries);
    }

    #[test]
    fn test_labels_use_shadow_and_right_alignment() {
        let mut surface = RecordingSurface::new();
        draw_wheel(&mut surface, &layout(), 0.0, &names(3));
        let cmds = &surface.commands;
        assert!(cmds.contains(&DrawCommand::TextAlign {
            align: TextAlign::Right
        }));
        assert!(cmds.contains(&DrawCommand::Shadow {
            shadow: Some(LABEL_SHADOW)
        }));
        assert!(cmds.contains(&DrawCommand::Font {
            font: "bold 18px sans-serif".to_string()
        }));
        let saves = cmds.iter().filter(|c| **c == DrawCommand::Save).count();
        let restores = cmds.iter().filter(|c| **c == DrawCommand::Restore).count();
        assert_eq!(saves, 3);
        assert_eq!(saves, restores);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let entries = vec!["A".repeat(200), "B".to_string()];
        let mut surface = RecordingSurface::new();
        draw_wheel(&mut surface, &layout(), 0.0, &entries);
        let texts = surface.texts();
        assert!(texts[0].ends_with('…'));
        assert!(texts[0].chars().count() < 200);
        assert_eq!(texts[1], "B");
    }

    #[test]
    fn test_empty_wheel_shows_prompt() {
        let mut surface = RecordingSurface::new();
        draw_wheel(&mut surface, &layout(), 1.0, &[]);
        assert_eq!(surface.texts(), vec!["Add some names"]);
        assert_eq!(surface.fills(), vec![EMPTY_COLOR, POINTER_COLOR]);
    }

    #[test]
    fn test_slice_under_pointer_matches_resolver() {
        // The drawn slice covering screen angle 0 is the one the resolver picks
        for &rotation in &[0.1, 1.0, 2.5, 4.0, 5.9] {
            for n in [2usize, 3, 4, 7, 12] {
                let mut surface = RecordingSurface::new();
                draw_wheel(&mut surface, &layout(), rotation, &names(n));
                let slice = TAU / n as f64;
                let under_pointer = surface
                    .arcs()
                    .into_iter()
                    .filter(|(r, _, _)| *r == layout().radius)
                    .position(|(_, start, _)| wrap_angle(-start) < slice)
                    .unwrap();
                assert_eq!(under_pointer, winning_index(rotation, n));
            }
        }
    }
}
