//! Scrolling weather/announcement marquee for serpentine-wired LED panel chains.
//!
//! The pipeline, leaves first:
//! - [`mapping`]: logical (x, y) → physical LED chain index
//! - [`canvas`]: RGB raster buffer with compositing operations
//! - [`text`], [`icons`], [`weather`], [`banner`]: content renderers that
//!   build wide "strip" canvases
//! - [`fireworks`]: particle overlay state advanced once per tick
//! - [`scheduler`]: samples a window of the strip, composites the overlay,
//!   maps every pixel, and hands one flat frame per tick to a sink
//! - [`sink`]: hardware / simulator / in-memory frame consumers

pub mod banner;
pub mod canvas;
pub mod config;
pub mod fireworks;
pub mod icons;
pub mod mapping;
pub mod scheduler;
pub mod sink;
pub mod text;
pub mod weather;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use smart_leds::RGB8;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the drawing and driver crates.
///
/// This keeps the compositing core testable without pulling hardware types
/// through every signature. At the boundaries we convert via `From`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black pixels are the transparent key when compositing scrolled
    /// content over the firework background.
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    /// Apply brightness scaling (0-100) to this color.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness >= 100 {
            return self;
        }
        Self {
            r: ((self.r as u16 * brightness as u16) / 100) as u8,
            g: ((self.g as u16 * brightness as u16) / 100) as u8,
            b: ((self.b as u16 * brightness as u16) / 100) as u8,
        }
    }

    /// Scale every channel by `factor` in `[0.0, 1.0]`, clamped.
    ///
    /// Used for particle fade-out: factor `1 - age/lifetime` reaches 0
    /// exactly at end of life.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * factor) as u8,
            g: (self.g as f32 * factor) as u8,
            b: (self.b as f32 * factor) as u8,
        }
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        Rgb888::new(c.r, c.g, c.b)
    }
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color::new(c.r(), c.g(), c.b())
    }
}

/// Convert to the driver crate's pixel type at the hardware boundary.
impl From<Color> for RGB8 {
    fn from(c: Color) -> Self {
        RGB8::new(c.r, c.g, c.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Color::new(rgb[0], rgb[1], rgb[2])
    }
}

// ── Shutdown flag ──────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the tick loop and the signal handler. `Arc`
/// gives both owners the same allocation; `AtomicBool` makes the single
/// bool thread-safe without a mutex.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    running
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn color_new() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.r, 10);
        assert_eq!(c.g, 20);
        assert_eq!(c.b, 30);
    }

    #[test]
    fn only_black_is_transparent() {
        assert!(Color::BLACK.is_black());
        assert!(!Color::new(0, 0, 1).is_black());
    }

    #[test]
    fn apply_brightness_100_is_identity() {
        let c = Color::new(100, 200, 50);
        assert_eq!(c.apply_brightness(100), c);
    }

    #[test]
    fn apply_brightness_above_100_is_identity() {
        let c = Color::new(100, 200, 50);
        assert_eq!(c.apply_brightness(255), c);
    }

    #[test]
    fn apply_brightness_0_is_black() {
        let c = Color::new(255, 255, 255);
        assert_eq!(c.apply_brightness(0), Color::BLACK);
    }

    #[test]
    fn apply_brightness_50_halves() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.apply_brightness(50), Color::new(100, 50, 25));
    }

    #[rstest]
    #[case(1.0, Color::new(200, 100, 50))]
    #[case(0.5, Color::new(100, 50, 25))]
    #[case(0.0, Color::BLACK)]
    fn scaled_interpolates_to_black(#[case] factor: f32, #[case] expected: Color) {
        assert_eq!(Color::new(200, 100, 50).scaled(factor), expected);
    }

    #[test]
    fn scaled_clamps_out_of_range_factors() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.scaled(2.0), c);
        assert_eq!(c.scaled(-1.0), Color::BLACK);
    }

    #[test]
    fn round_trips_through_rgb888() {
        let c = Color::new(1, 2, 3);
        assert_eq!(Color::from(Rgb888::from(c)), c);
    }
}
