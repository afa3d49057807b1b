//! 2D drawing surface abstraction
//!
//! Mirrors the subset of the canvas 2D context the wheel needs, so drawing
//! code runs (and is tested) off the browser.

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Drop shadow applied to subsequent fills and text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: &'static str,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// A 2D drawing target
pub trait Surface {
    /// Erase a rectangle starting at the origin
    fn clear(&mut self, width: f64, height: f64);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    /// Rotate subsequent drawing; positive is clockwise on screen
    fn rotate(&mut self, angle: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Clockwise arc from `start` to `end` (radians)
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);

    fn fill(&mut self, color: &str);
    fn stroke(&mut self, color: &str, width: f64);

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { angle: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    ClosePath,
    Fill { color: String },
    Stroke { color: String, width: f64 },
    Font { font: String },
    TextAlign { align: TextAlign },
    Shadow { shadow: Option<Shadow> },
    Text { text: String, x: f64, y: f64, color: String },
}

/// Surface that records calls instead of drawing. Used for headless runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All fill colors used, in order
    pub fn fills(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill { color } => Some(color.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All arcs drawn, as (radius, start, end)
    pub fn arcs(&self) -> Vec<(f64, f64, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::Arc {
                    radius, start, end, ..
                } => Some((radius, start, end)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCommand::Rotate { angle });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, color: &str) {
        self.commands.push(DrawCommand::Fill {
            color: color.to_string(),
        });
    }

    fn stroke(&mut self, color: &str, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            color: color.to_string(),
            width,
        });
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font {
            font: font.to_string(),
        });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::TextAlign { align });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::Shadow { shadow });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
        });
    }
}
