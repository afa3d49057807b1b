//! Wheel rendering module
//!
//! Draws against the `Surface` trait; the browser build backs it with a
//! canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod surface;
pub mod wheel;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use surface::{DrawCommand, RecordingSurface, Shadow, Surface, TextAlign};
pub use wheel::{WheelLayout, draw_wheel, fit_label, label_font_size, segment_color};
