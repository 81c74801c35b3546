//! The drawing primitives the deck renderer is written against.
//!
//! Coordinates are points with the origin at the bottom-left corner of the
//! sheet. Text boxes and images are anchored at their top-left corner.

use std::path::Path;

use crate::error::CardResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis aligned rectangle; `origin` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `rrggbb` (an optional leading `#` is accepted).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn components(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Placement and styling of a block of (optionally marked-up) text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub at: Point,
    pub width: f32,
    pub height: f32,
    pub size: f32,
    pub align: Align,
    pub bold: bool,
    /// Counter-clockwise rotation in degrees about the box centre.
    pub rotate: f32,
    pub shrink_to_fit: bool,
    /// Interpret whitelisted inline tags instead of printing them.
    pub inline_format: bool,
    /// Overrides the current fill colour for this box only.
    pub color: Option<Color>,
}

impl TextBox {
    pub fn new(at: Point, width: f32, height: f32, size: f32) -> Self {
        Self {
            at,
            width,
            height,
            size,
            align: Align::Left,
            bold: false,
            rotate: 0.0,
            shrink_to_fit: false,
            inline_format: false,
            color: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn shrink_to_fit(mut self) -> Self {
        self.shrink_to_fit = true;
        self
    }

    pub fn inline_format(mut self) -> Self {
        self.inline_format = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A page-oriented drawing target.
///
/// Colour, line width and dash settings persist until changed or until the
/// next page begins.
pub trait Surface {
    fn begin_page(&mut self, width: f32, height: f32) -> CardResult<()>;
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    /// `Some((on, off))` for a dash pattern, `None` for solid lines.
    fn set_dash(&mut self, dash: Option<(f32, f32)>);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32);
    fn stroke_line(&mut self, from: Point, to: Point);
    fn fill_circle(&mut self, center: Point, radius: f32);
    fn text_box(&mut self, text: &str, spec: &TextBox) -> CardResult<()>;
    /// Draw the image at `path` scaled to fit inside `fit`, preserving its aspect ratio.
    fn image(&mut self, path: &Path, fit: (f32, f32), top_left: Point) -> CardResult<()>;
}
