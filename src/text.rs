//! Text collaborator: glyph measurement and stamping.
//!
//! Rasterization is delegated to `embedded-graphics` mono fonts; this
//! module only selects a font by configured name (with a hardcoded
//! fallback) and exposes the measure/draw boundary the renderers use.

use crate::Color;
use crate::canvas::Canvas;
use embedded_graphics::Drawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii};
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};

/// Fallback when the configured font name is unknown.
const FALLBACK_FONT: &MonoFont<'static> = &ascii::FONT_6X13;

/// Measure/draw boundary between renderers and glyph rasterization.
pub trait TextRenderer {
    /// Pixel footprint of `text`: (width, height).
    fn measure(&self, text: &str) -> (u32, u32);

    /// Stamp `text` with its top-left corner at (x, y), writing only glyph
    /// pixels (background stays untouched).
    fn draw(&self, canvas: &mut Canvas, x: u32, y: u32, text: &str, color: Color);
}

/// Fixed-cell font renderer backed by the `embedded-graphics` ASCII fonts.
pub struct MonoText {
    font: &'static MonoFont<'static>,
}

impl MonoText {
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    /// Look up a font by config name ("9x18_bold", "6x13", ...). An unknown
    /// name logs a warning and falls back — a missing font is a recoverable
    /// collaborator failure, never fatal.
    pub fn from_name(name: &str) -> Self {
        match lookup(name) {
            Some(font) => Self { font },
            None => {
                tracing::warn!("unknown font {name:?}, falling back to 6x13");
                Self {
                    font: FALLBACK_FONT,
                }
            }
        }
    }

    pub fn glyph_height(&self) -> u32 {
        self.font.character_size.height
    }
}

fn lookup(name: &str) -> Option<&'static MonoFont<'static>> {
    Some(match name {
        "4x6" => &ascii::FONT_4X6,
        "5x8" => &ascii::FONT_5X8,
        "6x10" => &ascii::FONT_6X10,
        "6x13" => &ascii::FONT_6X13,
        "6x13_bold" => &ascii::FONT_6X13_BOLD,
        "7x13" => &ascii::FONT_7X13,
        "7x13_bold" => &ascii::FONT_7X13_BOLD,
        "8x13" => &ascii::FONT_8X13,
        "9x15" => &ascii::FONT_9X15,
        "9x15_bold" => &ascii::FONT_9X15_BOLD,
        "9x18" => &ascii::FONT_9X18,
        "9x18_bold" => &ascii::FONT_9X18_BOLD,
        "10x20" => &ascii::FONT_10X20,
        _ => return None,
    })
}

impl TextRenderer for MonoText {
    fn measure(&self, text: &str) -> (u32, u32) {
        let n = text.chars().count() as u32;
        if n == 0 {
            return (0, self.font.character_size.height);
        }
        let cell = self.font.character_size.width + self.font.character_spacing;
        (n * cell - self.font.character_spacing, self.font.character_size.height)
    }

    fn draw(&self, canvas: &mut Canvas, x: u32, y: u32, text: &str, color: Color) {
        let style = MonoTextStyle::new(self.font, color.into());
        let anchor = Point::new(x as i32, y as i32);
        // Canvas drawing is infallible; out-of-bounds pixels clip.
        let _ = Text::with_baseline(text, anchor, style, Baseline::Top).draw(canvas);
    }
}
